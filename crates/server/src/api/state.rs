use crate::orchestrator::RecommendationOrchestrator;

/// Largest `k` or `limit` a single request may ask for
pub const DEFAULT_MAX_K: usize = 50;

/// Shared application state
///
/// Everything inside is immutable after startup, so no lock is needed.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
    pub max_k: usize,
}

impl AppState {
    pub fn new(orchestrator: RecommendationOrchestrator) -> Self {
        Self {
            orchestrator,
            max_k: DEFAULT_MAX_K,
        }
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }
}
