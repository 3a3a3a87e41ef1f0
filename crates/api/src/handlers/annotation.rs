//! Handlers for the `/annotations` resource.
//!
//! Annotations are keyed by `(reviewer, video_id)`; the reviewer comes from
//! the [`ReviewerId`] extractor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use pairlabel_core::annotation::{Annotation, AnnotationPayload};
use pairlabel_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::reviewer::ReviewerId;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(video_id: String) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Annotation",
        key: video_id,
    })
}

/// GET /api/v1/annotations
///
/// Every reviewer's annotations, newest first.
pub async fn list_annotations(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Annotation>>>> {
    let annotations = state.annotations.list_all().await;
    Ok(Json(DataResponse { data: annotations }))
}

/// GET /api/v1/annotations/{video_id}
///
/// The caller's annotation of one video.
pub async fn get_annotation(
    State(state): State<AppState>,
    reviewer: ReviewerId,
    Path(video_id): Path<String>,
) -> AppResult<Json<DataResponse<Annotation>>> {
    let annotation = state
        .annotations
        .get(reviewer.as_str(), &video_id)
        .await
        .ok_or_else(|| not_found(video_id))?;
    Ok(Json(DataResponse { data: annotation }))
}

/// POST /api/v1/annotations
///
/// Upsert by `(reviewer, videoId)`. Returns 201 when a new record was
/// created and 200 when an existing one was replaced. Both speaker labels
/// are required. Video identity fields are taken from the catalog.
pub async fn upsert_annotation(
    State(state): State<AppState>,
    reviewer: ReviewerId,
    Json(mut payload): Json<AnnotationPayload>,
) -> AppResult<impl IntoResponse> {
    let Some(video) = state.catalog.find(&payload.video_id).await else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Video",
            key: payload.video_id,
        }));
    };
    payload.vendor_id = video.vendor_id;
    payload.session_id = video.session_id;
    payload.interaction_id = video.interaction_id;
    payload.speaker1_id = video.participant1_id;
    payload.speaker2_id = video.participant2_id;

    let (annotation, created) = state
        .annotations
        .upsert(reviewer.as_str(), payload, Utc::now())
        .await?;

    tracing::info!(
        reviewer = %reviewer.as_str(),
        video_id = %annotation.video_id,
        created,
        labeling_time_ms = annotation.labeling_time_ms,
        "Annotation saved"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: annotation })))
}

/// DELETE /api/v1/annotations/{video_id}
pub async fn delete_annotation(
    State(state): State<AppState>,
    reviewer: ReviewerId,
    Path(video_id): Path<String>,
) -> AppResult<StatusCode> {
    if state.annotations.delete(reviewer.as_str(), &video_id).await {
        tracing::info!(reviewer = %reviewer.as_str(), %video_id, "Annotation deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(video_id))
    }
}
