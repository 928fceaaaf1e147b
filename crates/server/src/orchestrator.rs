//! # Recommendation Orchestrator
//!
//! Async front of the pipeline, shared by the HTTP API and the CLI:
//! 1. Take a request from the async side
//! 2. Move the CPU-bound ranking onto the blocking pool
//! 3. Time it and log the outcome
//!
//! Catalog browsing and statistics are cheap lookups and run inline.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use data_loader::{BuildReport, Catalog, CatalogEntry, Genre, MovieId, ReleaseYear};
use pipeline::filters::GenreFilter;
use pipeline::{FilterPipeline, PreferenceQuery, Recommendation, RecommendationSet, Recommender};

/// One row of the catalog listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub year: Option<ReleaseYear>,
    pub genres: Vec<Genre>,
    pub mean_rating: Option<f32>,
    pub rating_count: u32,
}

impl From<&CatalogEntry> for MovieSummary {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id(),
            title: entry.item.title.clone(),
            year: entry.item.year,
            genres: entry.item.genres.iter().copied().collect(),
            mean_rating: entry.aggregate.mean_rating,
            rating_count: entry.aggregate.rating_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: Genre,
    pub count: usize,
}

/// Catalog-wide numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_movies: usize,
    pub total_ratings: u64,
    /// Distinct users with at least one accepted rating
    pub total_users: usize,
    /// Mean over every accepted rating; `None` for an unrated catalog
    pub avg_rating: Option<f32>,
    pub genres: Vec<Genre>,
    pub genre_counts: Vec<GenreCount>,
    /// Rows dropped while building the catalog
    pub skipped_rows: usize,
}

/// Coordinates requests against one loaded catalog
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    recommender: Arc<Recommender>,
    skipped_rows: usize,
}

impl RecommendationOrchestrator {
    pub fn new(recommender: Recommender, report: &BuildReport) -> Self {
        Self {
            recommender: Arc::new(recommender),
            skipped_rows: report.skipped(),
        }
    }

    /// Orchestrator over `catalog` with the built-in lexicon and default weights
    pub fn from_catalog(catalog: Arc<Catalog>) -> Self {
        Self {
            recommender: Arc::new(Recommender::new(catalog)),
            skipped_rows: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.recommender.catalog()
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Main entry point: rank the catalog for a preference query
    pub async fn get_recommendations(&self, query: PreferenceQuery) -> Result<RecommendationSet> {
        let start_time = Instant::now();
        let k = query.k;

        let recommender = Arc::clone(&self.recommender);
        let result = tokio::task::spawn_blocking(move || recommender.recommend(&query))
            .await
            .context("Recommendation task panicked")?;

        info!(
            "Returned {} of {} requested recommendations (genres: [{}]) in {:.2?}",
            result.len(),
            k,
            data_loader::join_genres(&result.matched_genres),
            start_time.elapsed()
        );
        Ok(result)
    }

    /// Best-rated movies with at least `min_ratings` ratings
    pub async fn get_top_rated(&self, limit: usize, min_ratings: u32) -> Result<Vec<Recommendation>> {
        let start_time = Instant::now();

        let recommender = Arc::clone(&self.recommender);
        let result = tokio::task::spawn_blocking(move || recommender.top_rated(limit, min_ratings))
            .await
            .context("Top-rated task panicked")?;

        info!(
            "Returned {} top-rated movies (min {} ratings) in {:.2?}",
            result.len(),
            min_ratings,
            start_time.elapsed()
        );
        Ok(result)
    }

    /// Most-rated movies, optionally limited to one genre
    ///
    /// Sorted by rating count, highest first, then by id.
    pub fn list_movies(&self, genre: Option<Genre>, limit: usize) -> Vec<MovieSummary> {
        let mut filters = FilterPipeline::new();
        if let Some(genre) = genre {
            filters = filters.add_filter(GenreFilter::new(genre));
        }

        let mut entries = filters.apply(self.catalog().entries().iter().collect());
        entries.sort_by(|a, b| {
            b.aggregate
                .rating_count
                .cmp(&a.aggregate.rating_count)
                .then_with(|| a.id().cmp(&b.id()))
        });
        entries.truncate(limit);
        entries.into_iter().map(MovieSummary::from).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let catalog = self.catalog();
        CatalogStats {
            total_movies: catalog.len(),
            total_ratings: catalog.total_ratings(),
            total_users: catalog.total_users(),
            avg_rating: catalog.overall_mean_rating(),
            genres: Genre::ALL.to_vec(),
            genre_counts: catalog
                .genre_counts()
                .into_iter()
                .map(|(genre, count)| GenreCount { genre, count })
                .collect(),
            skipped_rows: self.skipped_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{RawItem, RawRating};

    fn create_test_orchestrator() -> RecommendationOrchestrator {
        let mut ratings: Vec<RawRating> = (0..50).map(|u| RawRating::new(1, 4.0).by_user(u)).collect();
        ratings.extend((0..50).map(|u| RawRating::new(2, 3.0).by_user(u)));
        ratings.extend((100..105).map(|u| RawRating::new(3, 5.0).by_user(u)));
        // Unknown movie, skipped by the builder
        ratings.push(RawRating::new(99, 4.0));

        let (catalog, report) = Catalog::build(
            vec![
                RawItem::new(1, "Red River (1948)", vec![Genre::Western]),
                RawItem::new(2, "Rio Bravo (1959)", vec![Genre::Western]),
                RawItem::new(3, "Airplane! (1980)", vec![Genre::Comedy]),
            ],
            ratings,
        )
        .unwrap();
        RecommendationOrchestrator::new(Recommender::new(Arc::new(catalog)), &report)
    }

    #[tokio::test]
    async fn test_get_recommendations() {
        let orchestrator = create_test_orchestrator();
        let result = orchestrator
            .get_recommendations(PreferenceQuery::new("classic westerns").with_k(2))
            .await
            .unwrap();

        assert_eq!(result.matched_genres, vec![Genre::Western]);
        let ids: Vec<u32> = result.recommendations.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_get_top_rated() {
        let orchestrator = create_test_orchestrator();
        let top = orchestrator.get_top_rated(5, 10).await.unwrap();
        let ids: Vec<u32> = top.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_list_movies() {
        let orchestrator = create_test_orchestrator();

        let all = orchestrator.list_movies(None, 10);
        let ids: Vec<u32> = all.iter().map(|m| m.id).collect();
        // 1 and 2 tie on count
        assert_eq!(ids, vec![1, 2, 3]);

        let comedies = orchestrator.list_movies(Some(Genre::Comedy), 10);
        assert_eq!(comedies.len(), 1);
        assert_eq!(comedies[0].title, "Airplane!");

        assert_eq!(orchestrator.list_movies(None, 1).len(), 1);
    }

    #[test]
    fn test_stats() {
        let orchestrator = create_test_orchestrator();
        let stats = orchestrator.stats();

        assert_eq!(stats.total_movies, 3);
        assert_eq!(stats.total_ratings, 105);
        assert_eq!(stats.total_users, 55);
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(stats.genres.len(), 19);
        assert_eq!(
            stats.genre_counts,
            vec![
                GenreCount { genre: Genre::Comedy, count: 1 },
                GenreCount { genre: Genre::Western, count: 2 },
            ]
        );
    }
}
