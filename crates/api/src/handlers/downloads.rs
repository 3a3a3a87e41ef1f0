//! Handlers for local copies of participant videos.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pairlabel_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::downloads::{DownloadOutcome, DownloadRequest, DownloadStats};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteDownloadParams {
    #[serde(alias = "fileId1")]
    pub file_id1: Option<String>,
    #[serde(alias = "fileId2")]
    pub file_id2: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub removed_files: usize,
}

/// GET /api/v1/downloads/stats
pub async fn download_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DownloadStats>>> {
    let stats = state.downloads.stats().await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/downloads
///
/// Fetch both participant files of one interaction into the download
/// directory. Returns 201 with the local paths.
pub async fn create_download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome: DownloadOutcome = state.downloads.download_interaction(&request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// DELETE /api/v1/downloads?file_id1=&file_id2=
pub async fn delete_download(
    State(state): State<AppState>,
    Query(params): Query<DeleteDownloadParams>,
) -> AppResult<Json<DataResponse<DeleteOutcome>>> {
    let (Some(file_id1), Some(file_id2)) = (params.file_id1, params.file_id2) else {
        return Err(AppError::Core(CoreError::Validation(
            "Missing fileId1 or fileId2".into(),
        )));
    };

    let removed_files = state
        .downloads
        .delete_interaction(&file_id1, &file_id2)
        .await?;
    tracing::info!(%file_id1, %file_id2, removed_files, "Downloaded interaction deleted");

    Ok(Json(DataResponse {
        data: DeleteOutcome { removed_files },
    }))
}
