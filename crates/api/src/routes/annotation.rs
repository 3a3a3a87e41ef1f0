//! Route definitions for annotations.
//!
//! Mounted at `/annotations`.
//!
//! ```text
//! GET    /               list_annotations
//! POST   /               upsert_annotation
//! GET    /{video_id}     get_annotation
//! DELETE /{video_id}     delete_annotation
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::annotation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(annotation::list_annotations).post(annotation::upsert_annotation),
        )
        .route(
            "/{video_id}",
            get(annotation::get_annotation).delete(annotation::delete_annotation),
        )
}
