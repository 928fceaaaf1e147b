//! Core traits for the recommendation pipeline.
//!
//! - `Filter` narrows the candidate set before scoring
//! - `Scorer` turns one catalog entry plus the query's genres into a score
//!   and an explanation

use crate::GenreSet;
use data_loader::{CatalogEntry, Genre};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared by concurrent requests
/// - Filters take ownership of the Vec and return a narrowed Vec of the same
///   borrowed entries, so nothing in the catalog is cloned
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    fn apply<'a>(&self, candidates: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry>;
}

/// Everything a scorer worked out for one entry
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Final score, finite and non-negative
    pub score: f32,
    /// Genre relevance term (or the no-signal baseline)
    pub overlap: f32,
    /// Rating quality term in 0.0 - 1.0
    pub quality: f32,
    /// Additive popularity term
    pub popularity_bonus: f32,
    /// Genres shared by the item and the query, in genre order
    pub matched_genres: Vec<Genre>,
    /// Human-readable explanation
    pub reason: String,
}

/// Scores one catalog entry against the genres a query asked for.
///
/// Implementations must be pure and total: the same inputs always give the
/// same breakdown, and there is no failure path. Missing or odd rating data
/// falls back to neutral values.
pub trait Scorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, entry: &CatalogEntry, matched: &GenreSet) -> ScoreBreakdown;
}
