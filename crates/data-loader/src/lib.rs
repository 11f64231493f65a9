//! # Data Loader Crate
//!
//! This crate loads the movie catalog CSV and normalizes it into a
//! [`MovieTable`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, MovieTable, LoadReport)
//! - **parser**: CSV reading, required-field checks, genre literal parsing
//! - **index**: Table loading entry points and title search
//! - **error**: Error types for data loading
//!
//! ## Normalization
//!
//! - Rows with any required field missing are dropped.
//! - `genre_ids` is parsed from its list literal (`"[28, 12]"`) into integers;
//!   a malformed literal fails the whole load.
//! - Each movie gets `genres_combined` (space-joined ids) and
//!   `title_normalized` (lowercased, trimmed title).
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::MovieTable;
//! use std::path::Path;
//!
//! let table = MovieTable::load_from_csv(Path::new("movies.csv"))?;
//!
//! if let Some(row) = table.find_by_title("  inception ") {
//!     let movie = table.get(row).unwrap();
//!     println!("{} -> genres [{}]", movie.title, movie.genres_combined());
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::parse_genre_literal;
pub use types::{
    // Type aliases
    GenreId,
    MovieId,
    // Core types
    LoadReport,
    Movie,
    MovieTable,
    RawMovieRecord,
    // Helpers
    combine_genres,
    is_missing,
    normalize_title,
    MISSING_MARKERS,
    DEFAULT_IMAGE_BASE_URL,
};
