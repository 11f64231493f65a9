//! Error types for the data-loader crate.
//!
//! Only genuinely broken input is an error here. A row that is merely
//! incomplete is dropped during normalization and never reaches this enum.

use thiserror::Error;

/// Errors that can occur while loading and normalizing the movie catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV layer rejected the input (bad quoting, unequal row lengths, ...)
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A field could not be parsed into its typed form
    ///
    /// Raised for malformed genre list literals, which must never be
    /// mistaken for a movie with no genres.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field} at line {line}: {value}")]
    InvalidValue {
        field: String,
        value: String,
        line: usize,
    },

    /// The header row lacks a column every record needs
    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
