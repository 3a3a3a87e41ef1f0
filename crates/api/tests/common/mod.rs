#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use pairlabel_api::config::ServerConfig;
use pairlabel_api::router::build_app_router;
use pairlabel_api::state::AppState;

/// Three complete interactions (two improvised, one naturalistic), one
/// participant without a partner and one malformed row.
pub const FIXTURE_MANIFEST: &str = "file_id,label,split,batch_idx,archive_idx\n\
V00_S0001_I00000001_P0,improvised,dev,0,0\n\
V00_S0001_I00000001_P1,improvised,dev,0,0\n\
V00_S0001_I00000002_P0,naturalistic,dev,0,1\n\
V00_S0001_I00000002_P1,naturalistic,dev,0,1\n\
V01_S0002_I00000003_P0,improvised,test,1,0\n\
V01_S0002_I00000003_P1,improvised,test,1,0\n\
V01_S0002_I00000004_P0,improvised,dev,1,0\n\
not-a-file-id,improvised,dev,0,0\n";

/// Build a test `ServerConfig` rooted in `root`.
///
/// The remote manifest is disabled; the fixture manifest is read from the
/// local fallback path. Downloads live in `<root>/downloads`, which is also
/// the only allowed media root.
pub fn test_config(root: &Path) -> ServerConfig {
    let download_dir = root.join("downloads");
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        manifest_url: String::new(),
        manifest_cache_dir: root.join(".cache"),
        manifest_cache_ttl_secs: 3600,
        manifest_fallback_path: Some(root.join("filelist.csv")),
        media_origin_url: "http://127.0.0.1:9".to_string(),
        allowed_media_roots: vec![download_dir.clone()],
        download_dir,
        page_size: 20,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub config: ServerConfig,
    /// Keeps the temporary directory alive for the test's duration.
    pub dir: TempDir,
}

impl TestApp {
    pub fn download_dir(&self) -> PathBuf {
        self.config.download_dir.clone()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(json_request("POST", uri, None, body)).await
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    reviewer: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(reviewer) = reviewer {
        builder = builder.header("x-reviewer-id", reviewer);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build the full application with the fixture manifest loaded.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(|config| config, |state| state).await
}

/// Like [`build_test_app`], with hooks to adjust the config before the state
/// is built and the state before the router is built.
pub async fn build_test_app_with(
    configure: impl FnOnce(ServerConfig) -> ServerConfig,
    customize: impl FnOnce(AppState) -> AppState,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("filelist.csv"), FIXTURE_MANIFEST).unwrap();
    std::fs::create_dir_all(dir.path().join("downloads")).unwrap();

    let config = configure(test_config(dir.path()));
    let state = customize(AppState::new(config.clone()));
    state.refresh_catalog(false).await;

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        config,
        dir,
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
