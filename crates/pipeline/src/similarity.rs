//! Pairwise cosine similarity over feature rows.
//!
//! The matrix is symmetric, so only the upper triangle (diagonal included)
//! is stored, row by row. Each unordered pair is computed once, which makes
//! `get(i, j) == get(j, i)` hold exactly.

use crate::error::Result;
use crate::vectorizer::{FeatureMatrix, SparseVector, TfidfVectorizer};
use data_loader::MovieTable;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, instrument};

/// Cosine similarity of two sparse rows.
///
/// Defined as 0 when either row is all-zero, including a zero row compared
/// with itself. The result is clamped to [0, 1].
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Dense N x N cosine similarity, packed as an upper triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute every pair of `features`.
    ///
    /// Rows are filled in parallel; each worker owns a disjoint slice of the
    /// packed buffer.
    pub fn from_features(features: &FeatureMatrix) -> Self {
        let rows = features.rows();
        let n = rows.len();
        let norms: Vec<f64> = rows.iter().map(SparseVector::norm).collect();

        let mut data = vec![0f64; n * (n + 1) / 2];
        let mut segments: Vec<&mut [f64]> = Vec::with_capacity(n);
        let mut rest = data.as_mut_slice();
        for i in 0..n {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(n - i);
            segments.push(head);
            rest = tail;
        }

        segments
            .into_par_iter()
            .enumerate()
            .for_each(|(i, segment)| {
                // segment[k] holds (i, i + k)
                segment[0] = if norms[i] > 0.0 { 1.0 } else { 0.0 };
                for (k, slot) in segment.iter_mut().enumerate().skip(1) {
                    let j = i + k;
                    let denom = norms[i] * norms[j];
                    *slot = if denom == 0.0 {
                        0.0
                    } else {
                        (rows[i].dot(&rows[j]) / denom).clamp(0.0, 1.0)
                    };
                }
            });

        Self { n, data }
    }

    /// Number of movies (the matrix is `len() x len()`)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        i * (2 * self.n - i + 1) / 2 + (j - i)
    }

    /// Similarity of rows `i` and `j`, `None` when either is out of range
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.n || j >= self.n {
            return None;
        }
        Some(self.data[self.offset(i, j)])
    }

    /// Full similarity row of `i`, or `None` when out of range
    pub fn row(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.n {
            return None;
        }
        Some((0..self.n).map(|j| self.data[self.offset(i, j)]).collect())
    }
}

/// Vectorize the table's `genres_combined` column with the default
/// vectorizer and compute the similarity matrix.
pub fn build_similarity(table: &MovieTable) -> Result<(FeatureMatrix, SimilarityMatrix)> {
    build_similarity_with(table, &TfidfVectorizer::default())
}

/// Same as [`build_similarity`] with a configured vectorizer
#[instrument(skip_all, fields(movies = table.len()))]
pub fn build_similarity_with(
    table: &MovieTable,
    vectorizer: &TfidfVectorizer,
) -> Result<(FeatureMatrix, SimilarityMatrix)> {
    let start = Instant::now();

    let features = vectorizer.fit_transform(&table.genres_combined())?;
    let similarity = SimilarityMatrix::from_features(&features);

    info!(
        "Built similarity over {} movies and {} genre terms in {:?}",
        similarity.len(),
        features.vocabulary().len(),
        start.elapsed()
    );

    Ok((features, similarity))
}
