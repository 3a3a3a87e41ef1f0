//! Download-state reconciliation.
//!
//! Marks each interaction as locally available when both participant files
//! exist in the download directory. A half-downloaded pair counts as not
//! downloaded. Input interactions are never mutated; fresh records are
//! returned on every pass.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::grouping::Interaction;
use crate::types::{video_file_name, VIDEO_EXTENSION};

/// An interaction annotated with its local availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledInteraction {
    #[serde(flatten)]
    pub interaction: Interaction,
    pub is_downloaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant1_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant2_path: Option<PathBuf>,
}

/// Reconcile against an arbitrary presence check.
///
/// `is_present` receives the expected file name (`<file_id>.mp4`) relative to
/// `download_dir`.
pub fn reconcile<F>(
    interactions: &[Interaction],
    download_dir: &Path,
    is_present: F,
) -> Vec<ReconciledInteraction>
where
    F: Fn(&str) -> bool,
{
    interactions
        .iter()
        .map(|interaction| reconcile_one(interaction.clone(), download_dir, &is_present))
        .collect()
}

fn reconcile_one<F>(
    interaction: Interaction,
    download_dir: &Path,
    is_present: &F,
) -> ReconciledInteraction
where
    F: Fn(&str) -> bool,
{
    let name1 = video_file_name(&interaction.file_id1);
    let name2 = video_file_name(&interaction.file_id2);
    let is_downloaded = is_present(&name1) && is_present(&name2);

    ReconciledInteraction {
        interaction,
        is_downloaded,
        participant1_path: is_downloaded.then(|| download_dir.join(&name1)),
        participant2_path: is_downloaded.then(|| download_dir.join(&name2)),
    }
}

/// Snapshot of the video files present in a download directory.
#[derive(Debug, Clone)]
pub struct DownloadIndex {
    dir: PathBuf,
    files: HashSet<String>,
    reachable: bool,
}

impl DownloadIndex {
    /// An index with nothing downloaded.
    pub fn empty(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: HashSet::new(),
            reachable: false,
        }
    }

    /// Build an index from explicit file names (tests, fixtures).
    pub fn from_files<I, S>(dir: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir: dir.into(),
            files: files.into_iter().map(Into::into).collect(),
            reachable: true,
        }
    }

    /// List the directory once. An absent or unreadable directory yields an
    /// empty index rather than an error.
    pub async fn scan(dir: &Path) -> Self {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(_) => return Self::empty(dir),
        };

        let suffix = format!(".{VIDEO_EXTENSION}");
        let mut files = HashSet::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(&suffix) {
                    files.insert(name.to_string());
                }
            }
        }

        Self {
            dir: dir.to_path_buf(),
            files,
            reachable: true,
        }
    }

    /// Whether the directory could be listed at all.
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.contains(file_name)
    }

    /// Number of video files present.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn reconcile(&self, interactions: &[Interaction]) -> Vec<ReconciledInteraction> {
        reconcile(interactions, &self.dir, |name| self.contains(name))
    }

    /// Reconcile a single owned interaction.
    pub fn reconcile_owned(&self, interaction: Interaction) -> ReconciledInteraction {
        reconcile_one(interaction, &self.dir, &|name: &str| self.contains(name))
    }
}
