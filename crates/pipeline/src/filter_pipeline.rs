//! The FilterPipeline chains browsing filters.

use crate::traits::Filter;
use data_loader::MovieTable;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(GenreFilter::new([28, 12]))
///     .add_filter(MinimumVotesFilter::new(100));
///
/// let rows = pipeline.apply_all(&table);
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern)
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in order to `rows`
    pub fn apply(&self, rows: Vec<usize>, table: &MovieTable) -> Vec<usize> {
        let mut current = rows;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, table);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }

    /// Apply all filters to every row of the table
    pub fn apply_all(&self, table: &MovieTable) -> Vec<usize> {
        self.apply((0..table.len()).collect(), table)
    }
}
