//! Feature and similarity pipeline for the movie catalog.
//!
//! This crate provides:
//! - TfidfVectorizer turning each movie's genre tokens into a sparse row
//! - SimilarityMatrix holding pairwise cosine similarity of those rows
//! - Filter trait and FilterPipeline for browsing the catalog
//!
//! ## Architecture
//! The pipeline runs once per catalog load:
//! 1. `genres_combined` of every row is vectorized (TF-IDF, unit rows)
//! 2. Every pair of rows is compared (cosine, upper triangle only)
//! 3. The matrix is shared read-only by every recommendation query
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{build_similarity, FilterPipeline};
//! use pipeline::filters::*;
//!
//! let (features, similarity) = build_similarity(&table)?;
//! let score = similarity.get(0, 1);
//!
//! let rows = FilterPipeline::new()
//!     .add_filter(GenreFilter::new([28, 12]))
//!     .add_filter(MinimumVotesFilter::new(100))
//!     .apply_all(&table);
//! ```

pub mod error;
pub mod stop_words;
pub mod vectorizer;
pub mod similarity;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use error::{PipelineError, Result};
pub use filter_pipeline::FilterPipeline;
pub use similarity::{build_similarity, build_similarity_with, cosine_similarity, SimilarityMatrix};
pub use stop_words::StopWords;
pub use traits::Filter;
pub use vectorizer::{FeatureMatrix, SparseVector, TfidfVectorizer};
