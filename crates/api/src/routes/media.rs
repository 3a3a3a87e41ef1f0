//! Route definitions for media streaming.
//!
//! Mounted at `/media`.
//!
//! ```text
//! GET  /remote     stream_remote
//! GET  /local      stream_local
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/remote", get(media::stream_remote))
        .route("/local", get(media::stream_local))
}
