use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use data_loader::Genre;
use pipeline::{PreferenceQuery, Recommendation, DEFAULT_K, DEFAULT_MIN_RATINGS};

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::orchestrator::{CatalogStats, MovieSummary};

const DEFAULT_CATEGORY: &str = "movies";
const DEFAULT_MOVIE_LIMIT: usize = 20;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog_loaded: bool,
    pub movies: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub preferences: String,
    pub category: Option<String>,
    pub k: Option<usize>,
    pub min_ratings: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
    pub matched_genres: Vec<Genre>,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct TopRatedParams {
    pub limit: Option<usize>,
    pub min_ratings: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TopRatedResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct MoviesParams {
    pub genre: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<MovieSummary>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let movies = state.orchestrator.catalog().len();
    Json(HealthResponse {
        status: "ok",
        catalog_loaded: movies > 0,
        movies,
    })
}

/// Rank the catalog against free-text preferences
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<Json<RecommendResponse>> {
    let k = request.k.unwrap_or(DEFAULT_K).min(state.max_k);
    let category = request
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let mut query = PreferenceQuery::new(request.preferences)
        .with_k(k)
        .with_category(category.clone());
    if let Some(min_ratings) = request.min_ratings {
        query = query.with_min_ratings(min_ratings);
    }

    let result = state.orchestrator.get_recommendations(query).await?;
    Ok(Json(RecommendResponse {
        recommendations: result.recommendations,
        matched_genres: result.matched_genres,
        category,
    }))
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<TopRatedParams>,
) -> ApiResult<Json<TopRatedResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_K).min(state.max_k);
    let min_ratings = params.min_ratings.unwrap_or(DEFAULT_MIN_RATINGS);

    let recommendations = state.orchestrator.get_top_rated(limit, min_ratings).await?;
    Ok(Json(TopRatedResponse { recommendations }))
}

/// Most-rated movies, optionally for one genre
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesParams>,
) -> ApiResult<Json<MoviesResponse>> {
    let genre = match params.genre.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(label) => Some(
            Genre::from_label(label)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown genre: {}", label)))?,
        ),
    };
    let limit = params.limit.unwrap_or(DEFAULT_MOVIE_LIMIT);
    debug!(?genre, limit, "Listing movies");

    let movies = state.orchestrator.list_movies(genre, limit);
    Ok(Json(MoviesResponse { movies }))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.orchestrator.stats())
}
