//! Where the manifest text comes from.
//!
//! Order of preference: fresh cache, remote fetch (written back to the
//! cache), stale cache, local fallback file, nothing. Every step degrades
//! quietly; the caller always gets *some* manifest text.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::Context;
use serde::Serialize;

use crate::config::ServerConfig;

/// Cached manifest file name inside the cache directory.
pub const CACHE_FILE_NAME: &str = "filelist.csv";

/// Which step produced the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestOrigin {
    FreshCache,
    Remote,
    StaleCache,
    LocalFallback,
    Empty,
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub content: String,
    pub origin: ManifestOrigin,
}

/// Fetches and caches the dataset manifest.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    client: reqwest::Client,
    url: String,
    cache_file: PathBuf,
    ttl: Duration,
    fallback: Option<PathBuf>,
}

impl ManifestSource {
    pub fn from_config(config: &ServerConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            url: config.manifest_url.clone(),
            cache_file: config.manifest_cache_dir.join(CACHE_FILE_NAME),
            ttl: Duration::from_secs(config.manifest_cache_ttl_secs),
            fallback: config.manifest_fallback_path.clone(),
        }
    }

    /// Load the manifest. `force` skips the fresh-cache shortcut.
    pub async fn load(&self, force: bool) -> LoadedManifest {
        let cached = self.read_cache().await;

        if !force {
            if let Some((content, age)) = &cached {
                if *age < self.ttl {
                    tracing::debug!(age_secs = age.as_secs(), "Using cached manifest");
                    return LoadedManifest {
                        content: content.clone(),
                        origin: ManifestOrigin::FreshCache,
                    };
                }
            }
        }

        if !self.url.is_empty() {
            match self.fetch_remote().await {
                Ok(content) => {
                    if let Err(e) = self.write_cache(&content).await {
                        tracing::warn!(error = %format!("{e:#}"), "Failed to cache manifest");
                    }
                    return LoadedManifest {
                        content,
                        origin: ManifestOrigin::Remote,
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %format!("{e:#}"), url = %self.url, "Manifest fetch failed");
                }
            }
        }

        if let Some((content, _)) = cached {
            tracing::warn!("Falling back to stale cached manifest");
            return LoadedManifest {
                content,
                origin: ManifestOrigin::StaleCache,
            };
        }

        if let Some(path) = &self.fallback {
            match tokio::fs::read_to_string(path).await {
                Ok(content) => {
                    tracing::warn!("Using local fallback manifest");
                    return LoadedManifest {
                        content,
                        origin: ManifestOrigin::LocalFallback,
                    };
                }
                Err(e) => tracing::warn!(error = %e, "Local fallback manifest unreadable"),
            }
        }

        tracing::error!("No manifest available; catalog will be empty");
        LoadedManifest {
            content: String::new(),
            origin: ManifestOrigin::Empty,
        }
    }

    /// Cached content and its age, if a cache file exists.
    async fn read_cache(&self) -> Option<(String, Duration)> {
        let meta = tokio::fs::metadata(&self.cache_file).await.ok()?;
        let age = meta
            .modified()
            .ok()
            .and_then(|m| SystemTime::now().duration_since(m).ok())
            .unwrap_or(Duration::MAX);
        let content = tokio::fs::read_to_string(&self.cache_file).await.ok()?;
        Some((content, age))
    }

    async fn fetch_remote(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("manifest server returned an error status")?;
        response.text().await.context("failed to read manifest body")
    }

    async fn write_cache(&self, content: &str) -> anyhow::Result<()> {
        if let Some(dir) = self.cache_file.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        tokio::fs::write(&self.cache_file, content)
            .await
            .with_context(|| format!("writing {}", self.cache_file.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(dir: &std::path::Path, ttl: u64, fallback: Option<PathBuf>) -> ManifestSource {
        ManifestSource {
            client: reqwest::Client::new(),
            url: String::new(),
            cache_file: dir.join(CACHE_FILE_NAME),
            ttl: Duration::from_secs(ttl),
            fallback,
        }
    }

    #[tokio::test]
    async fn fresh_cache_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE_NAME), "cached").unwrap();
        let loaded = source(dir.path(), 3600, None).load(false).await;
        assert_eq!(loaded.origin, ManifestOrigin::FreshCache);
        assert_eq!(loaded.content, "cached");
    }

    #[tokio::test]
    async fn forced_load_without_remote_uses_stale_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE_NAME), "cached").unwrap();
        let loaded = source(dir.path(), 3600, None).load(true).await;
        assert_eq!(loaded.origin, ManifestOrigin::StaleCache);
    }

    #[tokio::test]
    async fn fallback_file_then_empty() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("local.csv");
        std::fs::write(&fallback, "local").unwrap();

        let loaded = source(dir.path(), 3600, Some(fallback)).load(false).await;
        assert_eq!(loaded.origin, ManifestOrigin::LocalFallback);
        assert_eq!(loaded.content, "local");

        let loaded = source(dir.path(), 3600, Some(dir.path().join("missing.csv")))
            .load(false)
            .await;
        assert_eq!(loaded.origin, ManifestOrigin::Empty);
        assert!(loaded.content.is_empty());
    }
}
