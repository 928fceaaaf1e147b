//! Server crate for the ReelRecs preference engine.
//!
//! This crate contains the orchestrator that runs pipeline requests off the
//! async runtime, and the axum HTTP API built on top of it.

pub mod api;
pub mod orchestrator;

pub use api::{create_router, serve, ApiError, AppState};
pub use orchestrator::{CatalogStats, GenreCount, MovieSummary, RecommendationOrchestrator};
