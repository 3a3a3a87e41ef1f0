//! Filesystem-backed media.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::StatusCode;
use pairlabel_core::range::{resolve_range, unsatisfied_content_range, RangeRequest};
use pairlabel_core::types::VIDEO_CONTENT_TYPE;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::{MediaReply, MediaSource, StreamError};

/// Byte access to stored files. The handler only calls this after the path
/// guard accepted the path.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// File size, or `None` when there is no regular file at `path`.
    async fn size_of(&self, path: &Path) -> std::io::Result<Option<u64>>;

    /// A body streaming `len` bytes starting at `start`.
    async fn open_range(&self, path: &Path, start: u64, len: u64) -> std::io::Result<Body>;
}

/// [`MediaStore`] over the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMediaStore;

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn size_of(&self, path: &Path) -> std::io::Result<Option<u64>> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn open_range(&self, path: &Path, start: u64, len: u64) -> std::io::Result<Body> {
        let mut file = tokio::fs::File::open(path).await?;
        if start > 0 {
            file.seek(std::io::SeekFrom::Start(start)).await?;
        }
        let stream = ReaderStream::new(file.take(len));
        Ok(Body::from_stream(stream))
    }
}

/// One file, served through a [`MediaStore`].
pub struct LocalFileSource {
    store: Arc<dyn MediaStore>,
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(store: Arc<dyn MediaStore>, path: PathBuf) -> Self {
        Self { store, path }
    }

    /// File name only, for error messages.
    fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaSource for LocalFileSource {
    async fn fetch(&self, range: Option<&str>) -> Result<MediaReply, StreamError> {
        let size = self
            .store
            .size_of(&self.path)
            .await?
            .ok_or_else(|| StreamError::NotFound(self.display_name()))?;

        let reply = match resolve_range(range, size) {
            RangeRequest::Full => MediaReply {
                status: StatusCode::OK,
                content_type: VIDEO_CONTENT_TYPE.to_string(),
                content_length: Some(size),
                content_range: None,
                body: self.store.open_range(&self.path, 0, size).await?,
            },
            RangeRequest::Partial(span) => MediaReply {
                status: StatusCode::PARTIAL_CONTENT,
                content_type: VIDEO_CONTENT_TYPE.to_string(),
                content_length: Some(span.len()),
                content_range: Some(span.content_range(size)),
                body: self.store.open_range(&self.path, span.start, span.len()).await?,
            },
            RangeRequest::Unsatisfiable => MediaReply {
                status: StatusCode::RANGE_NOT_SATISFIABLE,
                content_type: VIDEO_CONTENT_TYPE.to_string(),
                content_length: Some(0),
                content_range: Some(unsatisfied_content_range(size)),
                body: Body::empty(),
            },
        };

        Ok(reply)
    }
}
