use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Number of interactions in the loaded catalog.
    pub catalog_videos: usize,
}

/// GET /health -- returns service status and catalog size.
///
/// An empty catalog reports `degraded`: the server is up but has nothing to
/// label.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog_videos = state.catalog.snapshot().await.interactions.len();
    let status = if catalog_videos > 0 { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        catalog_videos,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
