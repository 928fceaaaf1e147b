//! Rating-aware genre scorer.
//!
//! ```text
//! overlap  = |item ∩ matched| / max(1, |matched|)    (baseline when matched is empty)
//! quality  = mean / 5                                 (neutral when unrated)
//! primary  = overlap * quality
//! bonus    = primary * popularity_weight * ln(1 + n) / ln(1 + saturation)
//! score    = primary + bonus
//! ```
//!
//! The popularity bonus scales with the primary term, so it can separate
//! near-ties but never lift an irrelevant item over a relevant one. With
//! `popularity_weight <= 1/9` the bonus stays under 10% of the total.

use crate::traits::{ScoreBreakdown, Scorer};
use crate::GenreSet;
use data_loader::{join_genres, CatalogEntry, Genre, RatingAggregate};
use serde::{Deserialize, Serialize};

/// Highest popularity weight that keeps the bonus under 10% of the score
pub const MAX_POPULARITY_WEIGHT: f32 = 1.0 / 9.0;

/// Tunable constants of the weighted scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Overlap used when the query matched no genres
    pub baseline_overlap: f32,
    /// Quality used for items without ratings
    pub neutral_quality: f32,
    /// Size of the popularity bonus relative to the primary term
    pub popularity_weight: f32,
    /// Rating count at which the popularity factor reaches 1.0
    pub popularity_saturation: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            baseline_overlap: 0.1,
            neutral_quality: 0.5,
            popularity_weight: 0.1,
            popularity_saturation: 1000,
        }
    }
}

impl ScoringWeights {
    /// Clamp every weight into its usable range
    ///
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let unit = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                fallback
            }
        };
        Self {
            baseline_overlap: unit(self.baseline_overlap, defaults.baseline_overlap),
            neutral_quality: unit(self.neutral_quality, defaults.neutral_quality),
            popularity_weight: if self.popularity_weight.is_finite() {
                self.popularity_weight.clamp(0.0, MAX_POPULARITY_WEIGHT)
            } else {
                defaults.popularity_weight
            },
            popularity_saturation: self.popularity_saturation.max(1),
        }
    }
}

/// Default `Scorer`: genre overlap gated by rating quality, plus a small
/// popularity term
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights: weights.sanitized(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn overlap(&self, item_genres: &GenreSet, matched: &GenreSet) -> (f32, Vec<Genre>) {
        if matched.is_empty() {
            return (self.weights.baseline_overlap, Vec::new());
        }
        let shared: Vec<Genre> = item_genres.intersection(matched).copied().collect();
        (shared.len() as f32 / matched.len().max(1) as f32, shared)
    }

    fn quality(&self, aggregate: &RatingAggregate) -> f32 {
        match aggregate.mean_rating {
            Some(mean) if aggregate.rating_count > 0 && mean.is_finite() => {
                (mean / 5.0).clamp(0.0, 1.0)
            }
            _ => self.weights.neutral_quality,
        }
    }

    /// Log-damped rating count in 0.0 - 1.0
    fn popularity(&self, rating_count: u32) -> f32 {
        let saturation = (1.0 + self.weights.popularity_saturation as f64).ln();
        let damped = (1.0 + rating_count as f64).ln() / saturation;
        damped.clamp(0.0, 1.0) as f32
    }
}

impl Scorer for WeightedScorer {
    fn name(&self) -> &str {
        "WeightedScorer"
    }

    fn score(&self, entry: &CatalogEntry, matched: &GenreSet) -> ScoreBreakdown {
        let (overlap, matched_genres) = self.overlap(&entry.item.genres, matched);
        let quality = self.quality(&entry.aggregate);
        let primary = overlap * quality;
        let popularity_bonus =
            primary * self.weights.popularity_weight * self.popularity(entry.aggregate.rating_count);

        let raw = primary + popularity_bonus;
        let score = if raw.is_finite() { raw.max(0.0) } else { 0.0 };

        let reason = explain(entry, matched, &matched_genres);
        ScoreBreakdown {
            score,
            overlap,
            quality,
            popularity_bonus,
            matched_genres,
            reason,
        }
    }
}

/// Build the reason string for one scored entry
///
/// With genres in the query, the reason names genres the item really has:
/// the shared ones if any, otherwise the item's own.
fn explain(entry: &CatalogEntry, matched: &GenreSet, shared: &[Genre]) -> String {
    let ratings = describe_ratings(&entry.aggregate);
    if matched.is_empty() {
        return format!("Based on overall popularity and quality: {}", ratings);
    }
    if !shared.is_empty() {
        return format!("Matches your interest in {} ({})", join_genres(shared), ratings);
    }
    if entry.item.genres.is_empty() {
        format!("Outside your requested genres; {}", ratings)
    } else {
        format!(
            "Outside your requested genres; a {} pick ({})",
            join_genres(&entry.item.genres),
            ratings
        )
    }
}

fn describe_ratings(aggregate: &RatingAggregate) -> String {
    match aggregate.mean_rating {
        Some(mean) if aggregate.rating_count > 0 => format!(
            "rated {:.1}/5 across {} rating{}",
            mean,
            aggregate.rating_count,
            if aggregate.rating_count == 1 { "" } else { "s" }
        ),
        _ => "not rated yet".to_string(),
    }
}
