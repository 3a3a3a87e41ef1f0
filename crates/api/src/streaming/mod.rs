//! Range-aware media streaming.
//!
//! Both media endpoints go through [`stream_range`]: a [`MediaSource`]
//! resolves bytes for an optional `Range` header, and this module turns
//! the reply into an HTTP response. The local source decides 200/206/416
//! itself from the file size; the remote source relays whatever the origin
//! answered.

pub mod local;
pub mod remote;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;
use pairlabel_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// Bytes plus the headers describing them.
#[derive(Debug)]
pub struct MediaReply {
    /// 200, 206 or 416.
    pub status: StatusCode,
    pub content_type: String,
    pub content_length: Option<u64>,
    pub content_range: Option<String>,
    pub body: Body,
}

/// Failures while resolving or opening media.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Media not found: {0}")]
    NotFound(String),

    #[error("Media origin returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Origin request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<StreamError> for AppError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::NotFound(key) => AppError::Core(CoreError::NotFound {
                entity: "Video",
                key,
            }),
            StreamError::Upstream { status, message } => AppError::Upstream { status, message },
            other => AppError::InternalError(format!("Failed to stream video: {other}")),
        }
    }
}

/// One capability: fetch a byte range of a named resource.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// `range` is the raw inbound `Range` header value, if any.
    async fn fetch(&self, range: Option<&str>) -> Result<MediaReply, StreamError>;
}

/// Raw `Range` header value. Non-ASCII values are treated as absent.
pub fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|v| v.to_str().ok())
}

/// Fetch from `source` and build the response. `Accept-Ranges: bytes` is
/// set on every reply.
pub async fn stream_range(source: &dyn MediaSource, range: Option<&str>) -> AppResult<Response> {
    let reply = source.fetch(range).await?;

    let mut builder = Response::builder()
        .status(reply.status)
        .header(header::CONTENT_TYPE, reply.content_type)
        .header(header::ACCEPT_RANGES, "bytes");
    if let Some(length) = reply.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length.to_string());
    }
    if let Some(content_range) = reply.content_range {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    builder
        .body(reply.body)
        .map_err(|e| AppError::InternalError(e.to_string()))
}
