//! Route definitions for local copies.
//!
//! Mounted at `/downloads`.
//!
//! ```text
//! POST   /           create_download
//! DELETE /           delete_download
//! GET    /stats      download_stats
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::downloads;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(downloads::create_download).delete(downloads::delete_download),
        )
        .route("/stats", get(downloads::download_stats))
}
