//! Ranking: score every candidate, order them, keep the top k.
//!
//! ## Order
//! 1. Score, highest first
//! 2. Rating count, highest first
//! 3. Movie id, lowest first
//!
//! Ids are unique in a catalog, so this is a total order and identical
//! requests always produce identical lists.

use crate::filter_pipeline::FilterPipeline;
use crate::scorer::WeightedScorer;
use crate::traits::{ScoreBreakdown, Scorer};
use crate::GenreSet;
use data_loader::{Catalog, CatalogEntry, Genre};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of results when the caller doesn't ask for a specific count
pub const DEFAULT_K: usize = 5;

/// A catalog entry scored for one request
///
/// Borrows from the catalog; lives only as long as the request.
#[derive(Debug, Clone)]
pub struct ScoredItem<'a> {
    pub entry: &'a CatalogEntry,
    pub breakdown: ScoreBreakdown,
}

impl ScoredItem<'_> {
    pub fn score(&self) -> f32 {
        self.breakdown.score
    }

    pub fn reason(&self) -> &str {
        &self.breakdown.reason
    }

    /// Genres shared by the item and the query
    pub fn matched_genres(&self) -> &[Genre] {
        &self.breakdown.matched_genres
    }
}

/// Total order used for every ranked list
pub fn ranking_order(a: &ScoredItem<'_>, b: &ScoredItem<'_>) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| {
            b.entry
                .aggregate
                .rating_count
                .cmp(&a.entry.aggregate.rating_count)
        })
        .then_with(|| a.entry.id().cmp(&b.entry.id()))
}

/// Scores and orders catalog entries with a shared `Scorer`
#[derive(Clone)]
pub struct Ranker {
    scorer: Arc<dyn Scorer>,
}

impl Ranker {
    pub fn new(scorer: impl Scorer + 'static) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    /// Top `k` entries of the whole catalog for `matched`
    pub fn rank<'a>(&self, catalog: &'a Catalog, matched: &GenreSet, k: usize) -> Vec<ScoredItem<'a>> {
        self.rank_filtered(catalog, matched, k, &FilterPipeline::new())
    }

    /// Top `k` entries among those that pass `filters`
    ///
    /// Scoring runs in parallel; `collect` keeps catalog order, and the
    /// sort below is total, so the result doesn't depend on thread timing.
    #[instrument(skip_all, fields(matched = matched.len(), k = k, scorer = self.scorer.name()))]
    pub fn rank_filtered<'a>(
        &self,
        catalog: &'a Catalog,
        matched: &GenreSet,
        k: usize,
        filters: &FilterPipeline,
    ) -> Vec<ScoredItem<'a>> {
        if k == 0 {
            return Vec::new();
        }

        let candidates = filters.apply(catalog.entries().iter().collect());

        let mut scored: Vec<ScoredItem<'a>> = candidates
            .par_iter()
            .map(|&entry| ScoredItem {
                entry,
                breakdown: self.scorer.score(entry, matched),
            })
            .collect();

        scored.sort_unstable_by(ranking_order);
        scored.truncate(k);

        debug!(
            candidates = candidates.len(),
            returned = scored.len(),
            "Ranked catalog"
        );
        scored
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(WeightedScorer::default())
    }
}
