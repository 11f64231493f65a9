//! Top-K lookup over a precomputed similarity matrix.
//!
//! These functions hold no state: the same title, table and matrix always
//! give the same answer.

use data_loader::{Movie, MovieTable};
use pipeline::SimilarityMatrix;

/// A candidate row and its similarity to the query row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRow {
    pub row: usize,
    pub score: f64,
}

/// Rank every row except `query` by similarity to it.
///
/// Highest score first; equal scores keep ascending row order. At most `k`
/// rows are returned. An out-of-range `query` gives nothing.
pub fn rank_rows(query: usize, similarity: &SimilarityMatrix, k: usize) -> Vec<ScoredRow> {
    let Some(scores) = similarity.row(query) else {
        return Vec::new();
    };

    let mut ranked: Vec<ScoredRow> = scores
        .into_iter()
        .enumerate()
        .filter(|&(row, _)| row != query)
        .map(|(row, score)| ScoredRow { row, score })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.row.cmp(&b.row)));
    ranked.truncate(k);
    ranked
}

/// Movies most similar to `title`, each with its score.
///
/// The title is matched case- and whitespace-insensitively; duplicates
/// resolve to the first row. An unknown title gives an empty list.
pub fn recommend_scored<'a>(
    title: &str,
    table: &'a MovieTable,
    similarity: &SimilarityMatrix,
    k: usize,
) -> Vec<(&'a Movie, f64)> {
    let Some(query) = table.find_by_title(title) else {
        return Vec::new();
    };

    rank_rows(query, similarity, k)
        .into_iter()
        .filter_map(|scored| table.get(scored.row).map(|movie| (movie, scored.score)))
        .collect()
}

/// Movies most similar to `title`, best first
pub fn recommend<'a>(
    title: &str,
    table: &'a MovieTable,
    similarity: &SimilarityMatrix,
    k: usize,
) -> Vec<&'a Movie> {
    recommend_scored(title, table, similarity, k)
        .into_iter()
        .map(|(movie, _)| movie)
        .collect()
}
