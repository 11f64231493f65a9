//! Filter implementations for catalog browsing.

pub mod genre;
pub mod minimum_votes;

// Re-export for convenience
pub use genre::GenreFilter;
pub use minimum_votes::MinimumVotesFilter;
