use axum::extract::State;
use axum::Json;
use pairlabel_core::stats::{annotation_stats, AnnotationStats, DatasetSummary};
use pairlabel_core::types::Timestamp;
use serde::Serialize;

use crate::error::AppResult;
use crate::manifest_source::ManifestOrigin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Catalog provenance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogInfo {
    pub source: ManifestOrigin,
    pub loaded_at: Timestamp,
    pub skipped_rows: usize,
    pub overfull_video_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub dataset: DatasetSummary,
    pub downloaded_videos: usize,
    pub annotations: AnnotationStats,
    pub catalog: CatalogInfo,
}

/// GET /api/v1/stats
///
/// Dataset summary, local availability and labeling statistics across all
/// reviewers.
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<StatsResponse>>> {
    let snapshot = state.catalog.snapshot().await;
    let annotations = state.annotations.list_all().await;
    let index = state.downloads.index().await;

    let downloaded_videos = index
        .reconcile(&snapshot.interactions)
        .iter()
        .filter(|r| r.is_downloaded)
        .count();

    Ok(Json(DataResponse {
        data: StatsResponse {
            dataset: snapshot.summary,
            downloaded_videos,
            annotations: annotation_stats(&annotations),
            catalog: CatalogInfo {
                source: snapshot.origin,
                loaded_at: snapshot.loaded_at,
                skipped_rows: snapshot.skipped_rows,
                overfull_video_ids: snapshot.report.overfull_video_ids.clone(),
            },
        },
    }))
}
