//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use data_loader::CatalogEntry;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MinimumRatingFilter::new(20))
///     .add_filter(GenreFilter::new(Genre::Western));
///
/// let candidates = pipeline.apply(catalog.entries().iter().collect());
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// Each filter sees the output of the one before it. Candidate order is
    /// preserved.
    pub fn apply<'a>(&self, candidates: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{GenreFilter, MinimumRatingFilter};
    use data_loader::{Catalog, Genre, RawItem, RawRating};

    fn create_test_catalog() -> Catalog {
        let (catalog, _) = Catalog::build(
            vec![
                RawItem::new(1, "Stagecoach (1939)", vec![Genre::Western]),
                RawItem::new(2, "Unforgiven (1992)", vec![Genre::Western]),
                RawItem::new(3, "Clueless (1995)", vec![Genre::Comedy]),
            ],
            (0..30)
                .map(|_| RawRating::new(2, 4.0))
                .chain((0..30).map(|_| RawRating::new(3, 3.5)))
                .collect(),
        )
        .unwrap();
        catalog
    }

    #[test]
    fn test_empty_pipeline() {
        let catalog = create_test_catalog();
        let pipeline = FilterPipeline::new();

        let filtered = pipeline.apply(catalog.entries().iter().collect());
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filters_chain_in_order() {
        let catalog = create_test_catalog();
        let pipeline = FilterPipeline::new()
            .add_filter(GenreFilter::new(Genre::Western))
            .add_filter(MinimumRatingFilter::new(10));

        let filtered = pipeline.apply(catalog.entries().iter().collect());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), 2);
    }
}
