//! Reviewer identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pairlabel_core::media_path::is_safe_segment;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the reviewer id.
pub const REVIEWER_HEADER: &str = "x-reviewer-id";

/// Reviewer used when the header is absent.
pub const DEFAULT_REVIEWER: &str = "local";

const MAX_REVIEWER_LEN: usize = 64;

/// The reviewer an annotation request acts for, taken from `x-reviewer-id`.
///
/// Annotations are keyed by `(reviewer, video)`. There is no authentication:
/// the header is trusted as given.
///
/// ```ignore
/// async fn my_handler(reviewer: ReviewerId) -> AppResult<Json<()>> {
///     tracing::info!(reviewer = %reviewer.0, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerId(pub String);

impl ReviewerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for ReviewerId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(REVIEWER_HEADER) else {
            return Ok(ReviewerId(DEFAULT_REVIEWER.to_string()));
        };

        let id = value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid x-reviewer-id header".into()))?
            .trim();

        if id.is_empty() {
            return Ok(ReviewerId(DEFAULT_REVIEWER.to_string()));
        }
        if id.len() > MAX_REVIEWER_LEN || !is_safe_segment(id) {
            return Err(AppError::BadRequest(
                "Reviewer id must be 1-64 characters of [A-Za-z0-9_-]".into(),
            ));
        }

        Ok(ReviewerId(id.to_string()))
    }
}
