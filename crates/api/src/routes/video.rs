//! Route definitions for the interaction catalog.
//!
//! Mounted at `/videos`.
//!
//! ```text
//! GET  /               list_videos
//! GET  /{video_id}     get_video
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(video::list_videos))
        .route("/{video_id}", get(video::get_video))
}
