//! Preference-to-recommendation pipeline over an in-memory catalog.
//!
//! This crate provides:
//! - `GenreLexicon` and `PreferenceInterpreter` for turning free text into genres
//! - `Scorer` trait and the default `WeightedScorer`
//! - `Filter` trait, implementations, and `FilterPipeline` for composing them
//! - `Ranker` for ordering candidates and taking the top k
//! - `Recommender` and `recommend` as the end-to-end entry points
//!
//! ## Architecture
//! Each request runs in stages:
//! 1. The interpreter maps the preference text to a set of genres
//! 2. Filters narrow the catalog (rating count, genre, release year)
//! 3. The scorer rates each remaining entry against the genres
//! 4. The ranker sorts by score, rating count, then id and keeps k
//!
//! Nothing in a request mutates the catalog or the lexicon, so one
//! `Recommender` can serve any number of threads.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{PreferenceQuery, Recommender};
//! use std::sync::Arc;
//!
//! let (catalog, _report) = Catalog::load_from_dir(Path::new("data/ml-100k"))?;
//! let recommender = Recommender::new(Arc::new(catalog));
//!
//! let result = recommender.recommend(&PreferenceQuery::new("I love sci-fi movies"));
//! for rec in &result.recommendations {
//!     println!("{} ({:.3}): {}", rec.title, rec.score, rec.reason);
//! }
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod interpreter;
pub mod lexicon;
pub mod ranker;
pub mod recommend;
pub mod scorer;
pub mod traits;

use data_loader::Genre;
use std::collections::BTreeSet;

/// Genres a query asked for, in genre order
pub type GenreSet = BTreeSet<Genre>;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use interpreter::{Interpretation, PreferenceInterpreter};
pub use lexicon::{GenreLexicon, LexiconEntry, LexiconError};
pub use ranker::{Ranker, ScoredItem, DEFAULT_K};
pub use recommend::{
    recommend, PreferenceQuery, Recommendation, RecommendationSet, Recommender,
    DEFAULT_MIN_RATINGS,
};
pub use scorer::{ScoringWeights, WeightedScorer};
pub use traits::{Filter, ScoreBreakdown, Scorer};
