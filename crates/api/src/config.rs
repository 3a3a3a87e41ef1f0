use std::path::{Path, PathBuf};

/// Dataset manifest published with the seamless interaction corpus.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/facebookresearch/seamless_interaction/main/assets/filelist.csv";

/// Public bucket serving the per-participant video files.
pub const DEFAULT_MEDIA_ORIGIN_URL: &str = "https://dl.fbaipublicfiles.com/seamless_interaction";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Remote manifest location. Empty disables the remote fetch.
    pub manifest_url: String,
    /// Directory holding the cached `filelist.csv`.
    pub manifest_cache_dir: PathBuf,
    pub manifest_cache_ttl_secs: u64,
    /// Local manifest used when neither cache nor remote is usable.
    pub manifest_fallback_path: Option<PathBuf>,
    /// Base URL of the remote media bucket.
    pub media_origin_url: String,
    /// Where downloaded participant videos live.
    pub download_dir: PathBuf,
    /// Absolute directories `/media/local` may read from.
    pub allowed_media_roots: Vec<PathBuf>,
    /// Default listing page size (default: `20`).
    pub page_size: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                   |
    /// |---------------------------|-------------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                                 |
    /// | `PORT`                    | `3000`                                    |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`                   |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                                      |
    /// | `MANIFEST_URL`            | [`DEFAULT_MANIFEST_URL`]                  |
    /// | `MANIFEST_CACHE_DIR`      | `.cache`                                  |
    /// | `MANIFEST_CACHE_TTL_SECS` | `86400`                                   |
    /// | `MANIFEST_FALLBACK_PATH`  | unset                                     |
    /// | `MEDIA_ORIGIN_URL`        | [`DEFAULT_MEDIA_ORIGIN_URL`]              |
    /// | `DOWNLOAD_DIR`            | `downloads`                               |
    /// | `ALLOWED_MEDIA_ROOTS`     | value of `DOWNLOAD_DIR`                   |
    /// | `PAGE_SIZE`               | `20`                                      |
    ///
    /// Relative directories are resolved against the working directory at
    /// startup so the media path guard always compares absolute paths.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let manifest_url =
            std::env::var("MANIFEST_URL").unwrap_or_else(|_| DEFAULT_MANIFEST_URL.into());

        let cwd = std::env::current_dir().expect("Failed to read the working directory");

        let manifest_cache_dir = absolutize(
            &cwd,
            &std::env::var("MANIFEST_CACHE_DIR").unwrap_or_else(|_| ".cache".into()),
        );

        let manifest_cache_ttl_secs: u64 = std::env::var("MANIFEST_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("MANIFEST_CACHE_TTL_SECS must be a valid u64");

        let manifest_fallback_path = std::env::var("MANIFEST_FALLBACK_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(|p| absolutize(&cwd, &p));

        let media_origin_url = std::env::var("MEDIA_ORIGIN_URL")
            .unwrap_or_else(|_| DEFAULT_MEDIA_ORIGIN_URL.into())
            .trim_end_matches('/')
            .to_string();

        let download_dir_raw = std::env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "downloads".into());
        let download_dir = absolutize(&cwd, &download_dir_raw);

        let allowed_media_roots = split_list(
            &std::env::var("ALLOWED_MEDIA_ROOTS").unwrap_or(download_dir_raw),
        )
        .iter()
        .map(|r| absolutize(&cwd, r))
        .collect();

        let page_size: u32 = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("PAGE_SIZE must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            manifest_url,
            manifest_cache_dir,
            manifest_cache_ttl_secs,
            manifest_fallback_path,
            media_origin_url,
            download_dir,
            allowed_media_roots,
            page_size,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn absolutize(base: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw.trim());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a", "b"]);
    }

    #[test]
    fn absolutize_keeps_absolute_paths() {
        let base = Path::new("/srv/app");
        assert_eq!(absolutize(base, "/data/x"), PathBuf::from("/data/x"));
        assert_eq!(absolutize(base, "downloads"), PathBuf::from("/srv/app/downloads"));
    }
}
