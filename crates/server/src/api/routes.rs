use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        // Recommendations
        .route("/api/recommend", post(handlers::recommend))
        .route("/api/top-rated", get(handlers::top_rated))
        // Catalog
        .route("/api/movies", get(handlers::list_movies))
        .route("/api/stats", get(handlers::get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
