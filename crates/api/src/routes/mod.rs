pub mod annotation;
pub mod catalog;
pub mod downloads;
pub mod health;
pub mod media;
pub mod ontology;
pub mod stats;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos                                  list (filter, sort, paginate)
/// /videos/{video_id}                       detail with caller's annotation
///
/// /catalog/refresh                         reload manifest (POST, ?force=true)
///
/// /stats                                   dataset + labeling statistics
///
/// /ontology                                all facets and signals
/// /ontology/{facet_id}                     one facet
///
/// /annotations                             list (GET), upsert (POST)
/// /annotations/{video_id}                  get, delete (caller's)
///
/// /media/remote                            Range-aware origin proxy
/// /media/local                             Range-aware allow-listed file
///
/// /downloads                               download pair (POST), delete (DELETE)
/// /downloads/stats                         local copy statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", video::router())
        .nest("/catalog", catalog::router())
        .nest("/stats", stats::router())
        .nest("/ontology", ontology::router())
        .nest("/annotations", annotation::router())
        .nest("/media", media::router())
        .nest("/downloads", downloads::router())
}
