//! The in-memory interaction catalog.
//!
//! Built from the manifest at startup and swapped wholesale on refresh.
//! Readers take an `Arc` snapshot and never hold the lock across awaits.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use pairlabel_core::grouping::{group_interactions_with_report, GroupingReport, Interaction};
use pairlabel_core::manifest::parse_manifest;
use pairlabel_core::reconcile::DownloadIndex;
use pairlabel_core::stats::{dataset_summary, DatasetSummary};
use pairlabel_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::manifest_source::{ManifestOrigin, ManifestSource};

/// One immutable generation of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub interactions: Vec<Interaction>,
    pub summary: DatasetSummary,
    pub origin: ManifestOrigin,
    pub skipped_rows: usize,
    pub report: GroupingReport,
    pub loaded_at: Timestamp,
}

impl CatalogSnapshot {
    pub fn from_interactions(interactions: Vec<Interaction>, origin: ManifestOrigin) -> Self {
        Self {
            summary: dataset_summary(&interactions),
            interactions,
            origin,
            skipped_rows: 0,
            report: GroupingReport::default(),
            loaded_at: Utc::now(),
        }
    }

    /// Parse and group manifest text. Unusable text yields an empty catalog.
    pub fn from_manifest(content: &str, origin: ManifestOrigin) -> Self {
        if content.trim().is_empty() {
            return Self::from_interactions(Vec::new(), origin);
        }

        let parsed = match parse_manifest(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, ?origin, "Manifest rejected");
                return Self::from_interactions(Vec::new(), origin);
            }
        };

        let (interactions, report) = group_interactions_with_report(&parsed.rows);

        if parsed.skipped_rows > 0 || report.unparsable_rows > 0 {
            tracing::warn!(
                skipped_rows = parsed.skipped_rows,
                unparsable_rows = report.unparsable_rows,
                "Manifest rows ignored"
            );
        }
        if !report.overfull_video_ids.is_empty() {
            tracing::warn!(
                count = report.overfull_video_ids.len(),
                video_ids = ?report.overfull_video_ids,
                "Video ids with more than two participant files; extra files replaced participant 2"
            );
        }

        Self {
            summary: dataset_summary(&interactions),
            interactions,
            origin,
            skipped_rows: parsed.skipped_rows,
            report,
            loaded_at: Utc::now(),
        }
    }
}

/// Shared handle to the current catalog generation.
#[derive(Debug)]
pub struct Catalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogSnapshot::from_interactions(Vec::new(), ManifestOrigin::Empty))
    }
}

impl Catalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn replace(&self, snapshot: CatalogSnapshot) {
        *self.current.write().await = Arc::new(snapshot);
    }

    pub async fn find(&self, video_id: &str) -> Option<Interaction> {
        self.snapshot()
            .await
            .interactions
            .iter()
            .find(|i| i.video_id == video_id)
            .cloned()
    }
}

/// Result of a catalog reload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub total_videos: usize,
    pub downloaded_videos: usize,
    pub skipped_rows: usize,
    pub unparsable_rows: usize,
    pub overfull_video_ids: Vec<String>,
    pub source: ManifestOrigin,
    pub duration_ms: u64,
}

/// Load the manifest, rebuild the catalog and swap it in.
pub async fn refresh_catalog(
    catalog: &Catalog,
    source: &ManifestSource,
    downloads: &DownloadIndex,
    force: bool,
) -> RefreshSummary {
    let started = Instant::now();
    let loaded = source.load(force).await;
    let snapshot = CatalogSnapshot::from_manifest(&loaded.content, loaded.origin);

    let downloaded_videos = downloads
        .reconcile(&snapshot.interactions)
        .iter()
        .filter(|r| r.is_downloaded)
        .count();

    let summary = RefreshSummary {
        total_videos: snapshot.interactions.len(),
        downloaded_videos,
        skipped_rows: snapshot.skipped_rows,
        unparsable_rows: snapshot.report.unparsable_rows,
        overfull_video_ids: snapshot.report.overfull_video_ids.clone(),
        source: loaded.origin,
        duration_ms: started.elapsed().as_millis() as u64,
    };

    tracing::info!(
        total_videos = summary.total_videos,
        downloaded_videos,
        source = ?summary.source,
        duration_ms = summary.duration_ms,
        "Catalog loaded"
    );

    catalog.replace(snapshot).await;
    summary
}
