//! Pass-through proxy to the remote media origin.
//!
//! The inbound `Range` header is forwarded verbatim and the origin's status,
//! `Content-Type`, `Content-Length` and `Content-Range` are relayed. The body
//! is streamed through without buffering.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::StatusCode;
use pairlabel_core::types::{video_file_name, VIDEO_CONTENT_TYPE};
use reqwest::header;

use super::{MediaReply, MediaSource, StreamError};

/// `{origin}/{label}/{split}/video/{file_id}.mp4`
pub fn remote_video_url(origin: &str, label: &str, split: &str, file_id: &str) -> String {
    format!(
        "{}/{label}/{split}/video/{}",
        origin.trim_end_matches('/'),
        video_file_name(file_id)
    )
}

/// A single remote video.
pub struct RemoteSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

fn header_str(headers: &header::HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl MediaSource for RemoteSource {
    /// A non-success origin status is returned as [`StreamError::Upstream`]
    /// with the same code. The message carries the status's canonical reason
    /// phrase: the client does not expose the origin's own reason phrase, and
    /// the origin's error body is not relayed.
    async fn fetch(&self, range: Option<&str>) -> Result<MediaReply, StreamError> {
        let mut request = self.client.get(&self.url);
        if let Some(range) = range {
            request = request.header(header::RANGE, range);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            return Err(StreamError::Upstream {
                status: status.as_u16(),
                message: format!("Video not found: {reason}"),
            });
        }

        let headers = response.headers();
        let content_type =
            header_str(headers, header::CONTENT_TYPE).unwrap_or_else(|| VIDEO_CONTENT_TYPE.into());
        let content_length = header_str(headers, header::CONTENT_LENGTH).and_then(|v| v.parse().ok());
        let content_range = header_str(headers, header::CONTENT_RANGE);

        Ok(MediaReply {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK),
            content_type,
            content_length,
            content_range,
            body: Body::from_stream(response.bytes_stream()),
        })
    }
}
