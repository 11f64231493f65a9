//! Filter out movies with too few votes to trust their rating.

use crate::traits::Filter;
use data_loader::MovieTable;

/// Keeps rows whose `vote_count` is at least the threshold
#[derive(Debug, Clone, Copy)]
pub struct MinimumVotesFilter {
    min_votes: u32,
}

impl MinimumVotesFilter {
    pub fn new(min_votes: u32) -> Self {
        Self { min_votes }
    }
}

impl Filter for MinimumVotesFilter {
    fn name(&self) -> &str {
        "MinimumVotesFilter"
    }

    fn apply(&self, rows: Vec<usize>, table: &MovieTable) -> Vec<usize> {
        rows.into_iter()
            .filter(|&row| {
                table
                    .get(row)
                    .is_some_and(|movie| movie.vote_count >= self.min_votes)
            })
            .collect()
    }
}
