//! Filter to ensure minimum quality threshold.
//!
//! Removes movies with too few ratings (and optionally a low average),
//! so thinly-rated titles don't top quality-driven lists.

use crate::traits::Filter;
use data_loader::CatalogEntry;

/// Removes candidates below quality thresholds.
///
/// ## Algorithm
/// For each candidate:
/// 1. Check rating_count >= min_count
/// 2. If a minimum mean is set, check avg rating >= min_mean
/// 3. Keep only if both conditions met
///
/// An unrated item only passes when `min_count` is 0 and no minimum mean is
/// set: it has no mean to compare.
pub struct MinimumRatingFilter {
    min_count: u32,
    min_mean: Option<f32>,
}

impl MinimumRatingFilter {
    /// Keep items with at least `min_count` ratings
    pub fn new(min_count: u32) -> Self {
        Self {
            min_count,
            min_mean: None,
        }
    }

    /// Also require an average of at least `min_mean`
    pub fn with_min_mean(mut self, min_mean: f32) -> Self {
        self.min_mean = Some(min_mean);
        self
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply<'a>(&self, candidates: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry> {
        candidates
            .into_iter()
            .filter(|entry| {
                let stats = &entry.aggregate;
                let enough = stats.rating_count >= self.min_count;
                let good = match self.min_mean {
                    None => true,
                    Some(min_mean) => stats.mean_rating.is_some_and(|mean| mean >= min_mean),
                };
                enough && good
            })
            .collect()
    }
}
