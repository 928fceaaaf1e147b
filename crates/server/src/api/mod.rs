//! HTTP API over the recommendation orchestrator.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppState, DEFAULT_MAX_K};

/// Bind `addr` and serve the API until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);

    info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
