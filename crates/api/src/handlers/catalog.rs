//! Handler for reloading the catalog from the manifest.

use axum::extract::{Query, State};
use axum::Json;

use crate::catalog::RefreshSummary;
use crate::error::AppResult;
use crate::query::ForceParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/catalog/refresh[?force=true]
///
/// `force` bypasses a fresh manifest cache. A failed fetch degrades to the
/// best available manifest and is reported in `source`, never as an error.
pub async fn refresh_catalog(
    State(state): State<AppState>,
    Query(params): Query<ForceParams>,
) -> AppResult<Json<DataResponse<RefreshSummary>>> {
    let summary = state.refresh_catalog(params.force).await;
    Ok(Json(DataResponse { data: summary }))
}
