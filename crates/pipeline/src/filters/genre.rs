//! Filter to the genres a user picked.

use crate::traits::Filter;
use data_loader::{GenreId, MovieTable};
use std::collections::BTreeSet;

/// Keeps rows tagged with at least one of the selected genres.
///
/// Matching is on genre ids, so selecting `12` never matches a movie
/// tagged only `10752`. An empty selection keeps every row.
#[derive(Debug, Clone, Default)]
pub struct GenreFilter {
    genres: BTreeSet<GenreId>,
}

impl GenreFilter {
    pub fn new(genres: impl IntoIterator<Item = GenreId>) -> Self {
        Self {
            genres: genres.into_iter().collect(),
        }
    }

    pub fn genres(&self) -> &BTreeSet<GenreId> {
        &self.genres
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, rows: Vec<usize>, table: &MovieTable) -> Vec<usize> {
        if self.genres.is_empty() {
            return rows;
        }
        rows.into_iter()
            .filter(|&row| {
                table
                    .get(row)
                    .is_some_and(|movie| movie.genre_ids.iter().any(|g| self.genres.contains(g)))
            })
            .collect()
    }
}
