//! Error types for the pipeline crate.

use thiserror::Error;

/// Errors raised while turning the catalog into features
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No token survived tokenization and stop word filtering anywhere in
    /// the corpus, so there is nothing to build feature columns from
    #[error("empty vocabulary: {documents} documents contain only stop words or no tokens")]
    EmptyVocabulary { documents: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PipelineError>;
