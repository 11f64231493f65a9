//! TF-IDF vectorization of genre token strings.
//!
//! Every document is split on whitespace and each token is treated as an
//! opaque term. Weights follow the smoothed scheme:
//!
//! ```text
//! tf(t, d)  = raw count of t in d
//! idf(t)    = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then each row is scaled to unit L2 norm
//! ```
//!
//! The vocabulary is sorted, so column order never depends on input order.

use crate::error::{PipelineError, Result};
use crate::stop_words::StopWords;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// A sparse row: `(column, weight)` pairs sorted by column, zeros omitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Entries must be sorted by column with no duplicates
    pub fn from_sorted(entries: Vec<(usize, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    /// Weight at `column`, 0 when absent
    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Output of [`TfidfVectorizer::fit_transform`]: one row per document, in
/// input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl FeatureMatrix {
    /// Terms in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }
}

/// Fits a vocabulary over a corpus and produces TF-IDF rows.
///
/// ## Usage
/// ```ignore
/// let features = TfidfVectorizer::new()
///     .with_stop_words(StopWords::None)
///     .fit_transform(&table.genres_combined())?;
/// ```
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    lowercase: bool,
    stop_words: StopWords,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            lowercase: true,
            stop_words: StopWords::English,
        }
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Whitespace tokens of `document` that survive the stop word list
    pub fn tokenize(&self, document: &str) -> Vec<String> {
        document
            .split_whitespace()
            .map(|token| {
                if self.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    /// Fit the vocabulary on `documents` and weight every document.
    ///
    /// An empty corpus yields an empty matrix. A non-empty corpus in which
    /// no token survives is an error.
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub fn fit_transform<S>(&self, documents: &[S]) -> Result<FeatureMatrix>
    where
        S: AsRef<str> + Sync,
    {
        if documents.is_empty() {
            return Ok(FeatureMatrix::default());
        }

        let counts: Vec<BTreeMap<String, usize>> = documents
            .par_iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for token in self.tokenize(doc.as_ref()) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let vocabulary: Vec<String> = counts
            .iter()
            .flat_map(|c| c.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if vocabulary.is_empty() {
            return Err(PipelineError::EmptyVocabulary {
                documents: documents.len(),
            });
        }

        let mut df = vec![0usize; vocabulary.len()];
        for doc in &counts {
            for term in doc.keys() {
                if let Ok(column) = vocabulary.binary_search(term) {
                    df[column] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseVector> = counts
            .par_iter()
            .map(|doc| {
                // BTreeMap iteration and the sorted vocabulary agree on order
                let mut entries: Vec<(usize, f64)> = doc
                    .iter()
                    .filter_map(|(term, &count)| {
                        let column = vocabulary.binary_search(term).ok()?;
                        Some((column, count as f64 * idf[column]))
                    })
                    .collect();

                let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for entry in &mut entries {
                        entry.1 /= norm;
                    }
                }
                SparseVector::from_sorted(entries)
            })
            .collect();

        debug!(
            "Vectorized {} documents over {} terms",
            rows.len(),
            vocabulary.len()
        );

        Ok(FeatureMatrix {
            vocabulary,
            idf,
            rows,
        })
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
