//! Read-only access to the behavioural signal ontology.

use axum::extract::Path;
use axum::Json;
use pairlabel_core::error::CoreError;
use pairlabel_core::ontology::{
    all_facets, facet_by_id, total_signal_count, Facet, ONTOLOGY_VERSION,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyResponse {
    pub version: &'static str,
    pub facet_count: usize,
    pub signal_count: usize,
    pub facets: &'static [Facet],
}

/// GET /api/v1/ontology
pub async fn get_ontology() -> AppResult<Json<DataResponse<OntologyResponse>>> {
    let facets = all_facets();
    Ok(Json(DataResponse {
        data: OntologyResponse {
            version: ONTOLOGY_VERSION,
            facet_count: facets.len(),
            signal_count: total_signal_count(),
            facets,
        },
    }))
}

/// GET /api/v1/ontology/{facet_id}
pub async fn get_facet(
    Path(facet_id): Path<String>,
) -> AppResult<Json<DataResponse<&'static Facet>>> {
    let facet = facet_by_id(&facet_id).ok_or(AppError::Core(CoreError::NotFound {
        entity: "Facet",
        key: facet_id,
    }))?;
    Ok(Json(DataResponse { data: facet }))
}
