//! Route definitions for the signal ontology.
//!
//! Mounted at `/ontology`.
//!
//! ```text
//! GET  /               get_ontology
//! GET  /{facet_id}     get_facet
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::ontology;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ontology::get_ontology))
        .route("/{facet_id}", get(ontology::get_facet))
}
