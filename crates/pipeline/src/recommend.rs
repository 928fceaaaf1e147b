//! End-to-end entry points: preference text in, recommendations out.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::MinimumRatingFilter;
use crate::interpreter::PreferenceInterpreter;
use crate::lexicon::GenreLexicon;
use crate::ranker::{Ranker, ScoredItem, DEFAULT_K};
use crate::scorer::{ScoringWeights, WeightedScorer};
use data_loader::{Catalog, CatalogEntry, Genre, MovieId, ReleaseYear};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Rating count an item needs before it can appear in top-rated lists
pub const DEFAULT_MIN_RATINGS: u32 = 20;

/// One recommendation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceQuery {
    pub text: String,
    /// Free-form selector echoed back to the caller
    pub category: Option<String>,
    pub k: usize,
    /// Drop items with fewer ratings before scoring
    pub min_ratings: Option<u32>,
}

impl PreferenceQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
            k: DEFAULT_K,
            min_ratings: None,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_ratings(mut self, min_ratings: u32) -> Self {
        self.min_ratings = Some(min_ratings);
        self
    }
}

/// Owned, serializable result record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
    pub year: Option<ReleaseYear>,
    pub genres: Vec<Genre>,
    pub description: String,
    /// `None` for unrated items
    pub mean_rating: Option<f32>,
    pub rating_count: u32,
    pub score: f32,
    pub reason: String,
}

impl Recommendation {
    fn from_entry(entry: &CatalogEntry, score: f32, reason: String) -> Self {
        Self {
            id: entry.id(),
            title: entry.item.title.clone(),
            year: entry.item.year,
            genres: entry.item.genres.iter().copied().collect(),
            description: entry.item.description(),
            mean_rating: entry.aggregate.mean_rating,
            rating_count: entry.aggregate.rating_count,
            score,
            reason,
        }
    }
}

impl From<&ScoredItem<'_>> for Recommendation {
    fn from(scored: &ScoredItem<'_>) -> Self {
        Self::from_entry(scored.entry, scored.score(), scored.reason().to_string())
    }
}

/// Ranked recommendations plus what the text was understood as
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub matched_genres: Vec<Genre>,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }
}

/// Recommendation engine over a shared catalog
///
/// Cheap to clone; every clone shares the catalog, lexicon and scorer.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    interpreter: PreferenceInterpreter,
    ranker: Ranker,
}

impl Recommender {
    /// Built-in lexicon and default weights
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            interpreter: PreferenceInterpreter::default(),
            ranker: Ranker::default(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Arc<GenreLexicon>) -> Self {
        self.interpreter = PreferenceInterpreter::new(lexicon);
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.ranker = Ranker::new(WeightedScorer::new(weights));
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn interpreter(&self) -> &PreferenceInterpreter {
        &self.interpreter
    }

    /// Rank the catalog against `query`
    ///
    /// Blank text yields an empty set. Text without any recognized phrase
    /// still gets a ranking, driven by quality and popularity alone.
    pub fn recommend(&self, query: &PreferenceQuery) -> RecommendationSet {
        run_query(&self.catalog, &self.interpreter, &self.ranker, query)
    }

    /// Best-rated items with at least `min_ratings` ratings
    ///
    /// Sorted by mean rating, then rating count, then id. Unrated items
    /// never qualify.
    pub fn top_rated(&self, n: usize, min_ratings: u32) -> Vec<Recommendation> {
        if n == 0 {
            return Vec::new();
        }

        let filters = FilterPipeline::new().add_filter(MinimumRatingFilter::new(min_ratings.max(1)));
        let mut candidates = filters.apply(self.catalog.entries().iter().collect());

        candidates.sort_by(|a, b| {
            let mean_a = a.aggregate.mean_rating.unwrap_or(0.0);
            let mean_b = b.aggregate.mean_rating.unwrap_or(0.0);
            mean_b
                .total_cmp(&mean_a)
                .then_with(|| b.aggregate.rating_count.cmp(&a.aggregate.rating_count))
                .then_with(|| a.id().cmp(&b.id()))
        });
        candidates.truncate(n);

        debug!(min_ratings, returned = candidates.len(), "Top rated");

        candidates
            .into_iter()
            .map(|entry| {
                let quality = entry
                    .aggregate
                    .mean_rating
                    .map_or(0.0, |mean| (mean / 5.0).clamp(0.0, 1.0));
                let reason = format!("Highly rated by {} users", entry.aggregate.rating_count);
                Recommendation::from_entry(entry, quality, reason)
            })
            .collect()
    }
}

/// Recommend `k` items for `text` with the built-in lexicon and default weights
///
/// Blank or whitespace-only text returns an empty list.
pub fn recommend(catalog: &Catalog, text: &str, k: usize) -> Vec<Recommendation> {
    let query = PreferenceQuery::new(text).with_k(k);
    run_query(
        catalog,
        &PreferenceInterpreter::default(),
        &Ranker::default(),
        &query,
    )
    .recommendations
}

fn run_query(
    catalog: &Catalog,
    interpreter: &PreferenceInterpreter,
    ranker: &Ranker,
    query: &PreferenceQuery,
) -> RecommendationSet {
    if query.text.trim().is_empty() {
        debug!("Blank preference text, nothing to recommend");
        return RecommendationSet::default();
    }

    let interpretation = interpreter.interpret_detailed(&query.text);
    if interpretation.is_empty() {
        info!("No genre keywords found, falling back to popularity and quality");
    } else {
        debug!(
            genres = %data_loader::join_genres(&interpretation.genres),
            phrases = ?interpretation.matched_phrases,
            "Interpreted preferences"
        );
    }

    let mut filters = FilterPipeline::new();
    if let Some(min_ratings) = query.min_ratings {
        filters = filters.add_filter(MinimumRatingFilter::new(min_ratings));
    }

    let ranked = ranker.rank_filtered(catalog, &interpretation.genres, query.k, &filters);

    RecommendationSet {
        matched_genres: interpretation.genres.iter().copied().collect(),
        recommendations: ranked.iter().map(Recommendation::from).collect(),
    }
}
