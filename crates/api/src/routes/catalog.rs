use axum::routing::post;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Mounted at `/catalog`.
pub fn router() -> Router<AppState> {
    Router::new().route("/refresh", post(catalog::refresh_catalog))
}
