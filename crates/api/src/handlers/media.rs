//! Range-aware media endpoints.
//!
//! `/media/remote` proxies a participant video from the media origin;
//! `/media/local` serves a file from an allow-listed directory. Both stream
//! through [`stream_range`].

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::response::Response;
use pairlabel_core::error::CoreError;
use pairlabel_core::file_id::is_exact_file_id;
use pairlabel_core::media_path::is_safe_segment;
use serde::Deserialize;

use crate::downloads::{DEFAULT_LABEL, DEFAULT_SPLIT};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::streaming::local::LocalFileSource;
use crate::streaming::remote::{remote_video_url, RemoteSource};
use crate::streaming::{range_header, stream_range};

const REMOTE_CACHE_CONTROL: &str = "public, max-age=3600";

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RemoteMediaParams {
    #[serde(alias = "fileId")]
    pub file_id: Option<String>,
    pub label: Option<String>,
    pub split: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalMediaParams {
    pub path: Option<String>,
}

fn validation(msg: &str) -> AppError {
    AppError::Core(CoreError::Validation(msg.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/media/remote?file_id=&label=&split=
///
/// Forwards `Range` to the origin and relays its status and range headers.
/// Origin failures keep the origin's status code.
pub async fn stream_remote(
    State(state): State<AppState>,
    Query(params): Query<RemoteMediaParams>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let file_id = params
        .file_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| validation("Missing fileId parameter"))?;
    if !is_exact_file_id(&file_id) {
        return Err(validation("Invalid fileId parameter"));
    }

    let label = params.label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
    let split = params.split.unwrap_or_else(|| DEFAULT_SPLIT.to_string());
    if !is_safe_segment(&label) || !is_safe_segment(&split) {
        return Err(validation("Invalid label or split parameter"));
    }

    let url = remote_video_url(&state.config.media_origin_url, &label, &split, &file_id);
    let range = range_header(&headers);
    tracing::debug!(%url, ?range, "Proxying remote video");

    let source = RemoteSource::new(state.http.clone(), url);
    let mut response = stream_range(&source, range).await?;
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(REMOTE_CACHE_CONTROL),
    );
    Ok(response)
}

/// GET /api/v1/media/local?path=
///
/// The path is checked against the allow-list before any filesystem access;
/// a path outside every root is 403, a missing file 404.
pub async fn stream_local(
    State(state): State<AppState>,
    Query(params): Query<LocalMediaParams>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let requested = params.path.unwrap_or_default();
    let path = state.path_guard.resolve(&requested).map_err(|e| {
        if matches!(e, CoreError::Forbidden(_)) {
            tracing::warn!(path = %requested, "Rejected media path outside allowed roots");
        }
        AppError::Core(e)
    })?;

    let source = LocalFileSource::new(Arc::clone(&state.media_store), path);
    stream_range(&source, range_header(&headers)).await
}
