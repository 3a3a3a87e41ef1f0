//! Handlers for the `/videos` resource.
//!
//! The catalog is filtered, sorted and paginated by the listing engine, then
//! each page is reconciled against a fresh listing of the download directory
//! and decorated with the URLs the player streams from.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use pairlabel_core::annotation::Annotation;
use pairlabel_core::error::CoreError;
use pairlabel_core::grouping::Interaction;
use pairlabel_core::listing::{list_interactions, ListingPage};
use pairlabel_core::reconcile::ReconciledInteraction;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::reviewer::ReviewerId;
use crate::query::ListVideosParams;
use crate::response::DataResponse;
use crate::state::AppState;

const REMOTE_MEDIA_PATH: &str = "/api/v1/media/remote";
const LOCAL_MEDIA_PATH: &str = "/api/v1/media/local";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One row of the video list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListItem {
    #[serde(flatten)]
    pub video: ReconciledInteraction,
    /// Where the player fetches participant 1 from.
    pub participant1_video_path: String,
    pub participant2_video_path: String,
    /// Whether any reviewer has annotated this video.
    pub is_annotated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: VideoListItem,
    /// The caller's annotation, if saved.
    pub annotation: Option<Annotation>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Relative URL with an encoded query string.
fn media_url(path: &str, params: &[(&str, &str)]) -> String {
    match reqwest::Url::parse_with_params(&format!("http://localhost{path}"), params) {
        Ok(url) => match url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        },
        Err(_) => path.to_string(),
    }
}

fn remote_media_url(interaction: &Interaction, file_id: &str) -> String {
    media_url(
        REMOTE_MEDIA_PATH,
        &[
            ("file_id", file_id),
            ("label", &interaction.label),
            ("split", &interaction.split),
        ],
    )
}

/// Downloaded pairs play from disk; everything else through the proxy.
fn to_list_item(video: ReconciledInteraction, is_annotated: bool) -> VideoListItem {
    let local = |path: &Option<std::path::PathBuf>| {
        path.as_ref()
            .map(|p| media_url(LOCAL_MEDIA_PATH, &[("path", &p.to_string_lossy())]))
    };

    let participant1_video_path = local(&video.participant1_path)
        .unwrap_or_else(|| remote_media_url(&video.interaction, &video.interaction.file_id1));
    let participant2_video_path = local(&video.participant2_path)
        .unwrap_or_else(|| remote_media_url(&video.interaction, &video.interaction.file_id2));

    VideoListItem {
        video,
        participant1_video_path,
        participant2_video_path,
        is_annotated,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/videos
///
/// Filtered, sorted page of the catalog with filter counts computed over the
/// whole catalog.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListVideosParams>,
) -> AppResult<Json<DataResponse<ListingPage<VideoListItem>>>> {
    let query = params.into_query(state.config.page_size);
    let snapshot = state.catalog.snapshot().await;
    let annotations = state.annotations.list_all().await;

    let page = list_interactions(&snapshot.interactions, &annotations, &query);
    let index = state.downloads.index().await;
    let annotated: HashSet<String> = page.annotated_video_ids.iter().cloned().collect();
    let page = page.map_items(|interaction| {
        let is_annotated = annotated.contains(&interaction.video_id);
        to_list_item(index.reconcile_owned(interaction), is_annotated)
    });

    tracing::debug!(
        total = page.total,
        page = page.page,
        downloaded = page.items.iter().filter(|i| i.video.is_downloaded).count(),
        "Listed videos"
    );

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/videos/{video_id}
pub async fn get_video(
    State(state): State<AppState>,
    reviewer: ReviewerId,
    Path(video_id): Path<String>,
) -> AppResult<Json<DataResponse<VideoDetail>>> {
    let interaction = state
        .catalog
        .find(&video_id)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Video",
                key: video_id.clone(),
            })
        })?;

    let index = state.downloads.index().await;
    let video = index.reconcile_owned(interaction);
    let annotation = state.annotations.get(reviewer.as_str(), &video_id).await;
    let is_annotated = state.annotations.has_any(&video_id).await;

    Ok(Json(DataResponse {
        data: VideoDetail {
            video: to_list_item(video, is_annotated),
            annotation,
        },
    }))
}
