use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Mounted at `/stats`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stats::get_stats))
}
