//! Local copies of participant videos.
//!
//! Files are streamed from the media origin into the download directory as
//! `<file_id>.mp4`. A transfer is written to a `.part` file first and only
//! renamed on success, so an interrupted download never looks complete to
//! the reconciler.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use pairlabel_core::error::CoreError;
use pairlabel_core::file_id::is_exact_file_id;
use pairlabel_core::media_path::is_safe_segment;
use pairlabel_core::reconcile::DownloadIndex;
use pairlabel_core::types::{video_file_name, VIDEO_EXTENSION};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::AppError;
use crate::streaming::remote::remote_video_url;

pub const DEFAULT_LABEL: &str = "improvised";
pub const DEFAULT_SPLIT: &str = "dev";

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_split() -> String {
    DEFAULT_SPLIT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(alias = "file_id1")]
    pub file_id1: String,
    #[serde(alias = "file_id2")]
    pub file_id2: String,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_split")]
    pub split: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    pub participant1_path: PathBuf,
    pub participant2_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStats {
    pub downloaded_count: usize,
    pub total_size: u64,
    pub download_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("{0}")]
    Invalid(String),

    #[error("Failed to download: {status} {message}")]
    Upstream { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<DownloadError> for AppError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Invalid(msg) => AppError::Core(CoreError::Validation(msg)),
            DownloadError::Upstream { status, message } => AppError::Upstream {
                status,
                message: format!("Failed to download: {message}"),
            },
            other => AppError::InternalError(other.to_string()),
        }
    }
}

fn check_ids(file_ids: [&str; 2]) -> Result<(), DownloadError> {
    match file_ids.iter().find(|id| !is_exact_file_id(id)) {
        Some(bad) => Err(DownloadError::Invalid(format!("Invalid file id '{bad}'"))),
        None => Ok(()),
    }
}

/// A `.part` file that is deleted when dropped unless it was committed.
///
/// Covers failed transfers as well as futures dropped mid-stream, such as a
/// sibling transfer cancelled by `try_join!` or a client disconnect.
#[derive(Debug)]
struct PartialFile {
    path: PathBuf,
    dest: PathBuf,
    committed: bool,
}

impl PartialFile {
    fn new(dest: &Path) -> Self {
        Self {
            path: dest.with_extension(format!("{VIDEO_EXTENSION}.part")),
            dest: dest.to_path_buf(),
            committed: false,
        }
    }

    /// Rename the finished transfer to its final name.
    async fn commit(mut self) -> Result<PathBuf, DownloadError> {
        tokio::fs::rename(&self.path, &self.dest).await?;
        self.committed = true;
        Ok(std::mem::take(&mut self.dest))
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Partial file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove partial file")
            }
        }
    }
}

/// Downloads, deletes and counts local participant videos.
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
    origin: String,
    dir: PathBuf,
}

impl DownloadManager {
    pub fn new(client: reqwest::Client, origin: String, dir: PathBuf) -> Self {
        Self { client, origin, dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current contents of the download directory.
    pub async fn index(&self) -> DownloadIndex {
        DownloadIndex::scan(&self.dir).await
    }

    /// Fetch both participant files of one interaction.
    pub async fn download_interaction(
        &self,
        request: &DownloadRequest,
    ) -> Result<DownloadOutcome, DownloadError> {
        check_ids([request.file_id1.as_str(), request.file_id2.as_str()])?;
        if !is_safe_segment(&request.label) || !is_safe_segment(&request.split) {
            return Err(DownloadError::Invalid("Invalid label or split".to_string()));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let fetch = |file_id: &str| {
            let url = remote_video_url(&self.origin, &request.label, &request.split, file_id);
            let dest = self.dir.join(video_file_name(file_id));
            async move { self.download_file(&url, &dest).await }
        };

        // A failed transfer drops its sibling mid-stream; each guard removes
        // its own `.part` file, so neither file of the pair is committed.
        let (p1, p2) = tokio::try_join!(
            fetch(request.file_id1.as_str()),
            fetch(request.file_id2.as_str())
        )?;
        let p1 = p1.commit().await?;
        let p2 = p2.commit().await?;

        tracing::info!(
            file_id1 = %request.file_id1,
            file_id2 = %request.file_id2,
            "Interaction downloaded"
        );

        Ok(DownloadOutcome {
            participant1_path: p1,
            participant2_path: p2,
        })
    }

    /// Stream `url` into a `.part` file next to `dest`. The returned guard
    /// must be committed to move the file into place.
    async fn download_file(&self, url: &str, dest: &Path) -> Result<PartialFile, DownloadError> {
        let partial = PartialFile::new(dest);
        tracing::debug!(%url, "Downloading");

        if let Err(e) = self.stream_to(url, &partial.path).await {
            tracing::warn!(%url, error = %e, "Download failed, partial file removed");
            return Err(e);
        }
        Ok(partial)
    }

    async fn stream_to(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }

    /// Remove both files when present. Returns how many were deleted.
    pub async fn delete_interaction(
        &self,
        file_id1: &str,
        file_id2: &str,
    ) -> Result<usize, DownloadError> {
        check_ids([file_id1, file_id2])?;

        let mut removed = 0;
        for file_id in [file_id1, file_id2] {
            match tokio::fs::remove_file(self.dir.join(video_file_name(file_id))).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }

    /// Count and total size of the video files on disk.
    pub async fn stats(&self) -> Result<DownloadStats, DownloadError> {
        let mut stats = DownloadStats {
            downloaded_count: 0,
            total_size: 0,
            download_dir: self.dir.clone(),
        };

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e.into()),
        };

        let suffix = format!(".{VIDEO_EXTENSION}");
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_name().to_string_lossy().ends_with(&suffix) {
                continue;
            }
            let meta = entry.metadata().await?;
            if meta.is_file() {
                stats.downloaded_count += 1;
                stats.total_size += meta.len();
            }
        }
        Ok(stats)
    }
}
