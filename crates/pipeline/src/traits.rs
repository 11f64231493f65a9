//! Core traits for browsing the catalog.
//!
//! A filter narrows a list of table rows. Filters compose through
//! [`FilterPipeline`](crate::FilterPipeline).

use data_loader::MovieTable;

/// Narrows a set of catalog rows.
///
/// ## Design Note
/// - `Send + Sync` lets a built pipeline be shared across threads
/// - Filters take ownership of the row list and return the kept rows in the
///   same relative order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Keep the rows of `table` this filter accepts
    fn apply(&self, rows: Vec<usize>, table: &MovieTable) -> Vec<usize>;
}
