use std::sync::Arc;

use pairlabel_core::media_path::MediaPathGuard;

use crate::catalog::{refresh_catalog, Catalog, RefreshSummary};
use crate::config::ServerConfig;
use crate::downloads::DownloadManager;
use crate::manifest_source::ManifestSource;
use crate::store::AnnotationStore;
use crate::streaming::local::{FsMediaStore, MediaStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Current interaction catalog.
    pub catalog: Arc<Catalog>,
    pub annotations: Arc<AnnotationStore>,
    pub manifest_source: Arc<ManifestSource>,
    pub downloads: Arc<DownloadManager>,
    /// Allow-list for `/media/local`.
    pub path_guard: Arc<MediaPathGuard>,
    /// Byte access for `/media/local`.
    pub media_store: Arc<dyn MediaStore>,
    /// Outbound client for the media origin.
    pub http: reqwest::Client,
}

impl AppState {
    /// Wire up all services from configuration. The catalog starts empty;
    /// call [`AppState::refresh_catalog`] to populate it.
    pub fn new(config: ServerConfig) -> Self {
        let http = reqwest::Client::new();
        let manifest_source = ManifestSource::from_config(&config, http.clone());
        let downloads = DownloadManager::new(
            http.clone(),
            config.media_origin_url.clone(),
            config.download_dir.clone(),
        );
        let path_guard = MediaPathGuard::new(&config.allowed_media_roots);

        Self {
            config: Arc::new(config),
            catalog: Arc::new(Catalog::default()),
            annotations: Arc::new(AnnotationStore::new()),
            manifest_source: Arc::new(manifest_source),
            downloads: Arc::new(downloads),
            path_guard: Arc::new(path_guard),
            media_store: Arc::new(FsMediaStore),
            http,
        }
    }

    /// Replace the byte store behind `/media/local`.
    pub fn with_media_store(mut self, store: Arc<dyn MediaStore>) -> Self {
        self.media_store = store;
        self
    }

    pub async fn refresh_catalog(&self, force: bool) -> RefreshSummary {
        let index = self.downloads.index().await;
        refresh_catalog(&self.catalog, &self.manifest_source, &index, force).await
    }
}
