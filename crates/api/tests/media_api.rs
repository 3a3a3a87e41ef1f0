mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Path as UrlPath;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use common::{body_bytes, body_json, build_test_app, build_test_app_with, TestApp};
use pairlabel_api::streaming::local::MediaStore;

const FILE_SIZE: usize = 1_000_000;

fn video_bytes() -> Vec<u8> {
    (0..FILE_SIZE).map(|i| (i % 251) as u8).collect()
}

async fn app_with_video() -> (TestApp, String) {
    let app = build_test_app().await;
    let path = app.download_dir().join("V00_S0001_I00000001_P0.mp4");
    std::fs::write(&path, video_bytes()).unwrap();
    (app, path.to_string_lossy().into_owned())
}

fn local_uri(path: &str) -> String {
    let url = reqwest::Url::parse_with_params("http://x/api/v1/media/local", &[("path", path)]).unwrap();
    format!("{}?{}", url.path(), url.query().unwrap())
}

async fn get_range(app: &TestApp, uri: &str, range: Option<&str>) -> Response<Body> {
    let mut builder = Request::get(uri);
    if let Some(range) = range {
        builder = builder.header(header::RANGE, range);
    }
    app.send(builder.body(Body::empty()).unwrap()).await
}

fn header_str<'a>(response: &'a Response<Body>, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

// ---------------------------------------------------------------------------
// Test: local streaming honours Range
// ---------------------------------------------------------------------------

#[tokio::test]
async fn local_without_range_is_full_200() {
    let (app, path) = app_with_video().await;

    let response = get_range(&app, &local_uri(&path), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), Some("1000000"));
    assert_eq!(header_str(&response, header::ACCEPT_RANGES), Some("bytes"));
    assert_eq!(header_str(&response, header::CONTENT_TYPE), Some("video/mp4"));
    assert!(response.headers().get(header::CONTENT_RANGE).is_none());
    assert_eq!(body_bytes(response).await.len(), FILE_SIZE);
}

#[tokio::test]
async fn local_closed_range_is_206() {
    let (app, path) = app_with_video().await;

    let response = get_range(&app, &local_uri(&path), Some("bytes=0-1023")).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        header_str(&response, header::CONTENT_RANGE),
        Some("bytes 0-1023/1000000")
    );
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), Some("1024"));
    let body = body_bytes(response).await;
    assert_eq!(body, video_bytes()[..1024]);
}

#[tokio::test]
async fn local_open_range_runs_to_end() {
    let (app, path) = app_with_video().await;

    let response = get_range(&app, &local_uri(&path), Some("bytes=999000-")).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        header_str(&response, header::CONTENT_RANGE),
        Some("bytes 999000-999999/1000000")
    );
    let body = body_bytes(response).await;
    assert_eq!(body.len(), 1000);
    assert_eq!(body, video_bytes()[999_000..]);
}

#[tokio::test]
async fn local_unsatisfiable_range_is_416() {
    let (app, path) = app_with_video().await;

    let response = get_range(&app, &local_uri(&path), Some("bytes=2000000-")).await;

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(header_str(&response, header::CONTENT_RANGE), Some("bytes */1000000"));
}

#[tokio::test]
async fn local_malformed_range_serves_full_body() {
    let (app, path) = app_with_video().await;

    let response = get_range(&app, &local_uri(&path), Some("items=1-2")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, header::CONTENT_LENGTH), Some("1000000"));
}

// ---------------------------------------------------------------------------
// Test: the path guard runs before any filesystem access
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SpyStore {
    calls: AtomicUsize,
}

#[async_trait]
impl MediaStore for SpyStore {
    async fn size_of(&self, _path: &Path) -> std::io::Result<Option<u64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn open_range(&self, _path: &Path, _start: u64, _len: u64) -> std::io::Result<Body> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Body::empty())
    }
}

#[tokio::test]
async fn traversal_is_forbidden_without_touching_storage() {
    let spy = Arc::new(SpyStore::default());
    let store: Arc<dyn MediaStore> = spy.clone();
    let app = build_test_app_with(|config| config, move |state| state.with_media_store(store)).await;

    let escaping = format!("{}/../filelist.csv", app.download_dir().display());
    for path in [escaping.as_str(), "/etc/passwd", "../../etc/passwd"] {
        let response = app.get(&local_uri(path)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "path {path}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "FORBIDDEN");
    }

    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_local_file_is_404() {
    let app = build_test_app().await;
    let path = app.download_dir().join("V09_S0009_I00000009_P0.mp4");

    let response = app.get(&local_uri(&path.to_string_lossy())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(!json["error"].as_str().unwrap().contains(&*app.download_dir().to_string_lossy()));
}

#[tokio::test]
async fn missing_path_parameter_is_400() {
    let app = build_test_app().await;
    let response = app.get("/api/v1/media/local").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: remote proxy
// ---------------------------------------------------------------------------

const ORIGIN_FILE: &str = "V00_S0001_I00000001_P0.mp4";

/// Serves one 100-byte file at `/improvised/dev/video/<ORIGIN_FILE>` and
/// echoes whether a Range header arrived.
const DENIED_FILE: &str = "V00_S0001_I00000008_P0.mp4";

async fn origin_handler(
    UrlPath((label, split, file)): UrlPath<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    if file == DENIED_FILE {
        return (StatusCode::FORBIDDEN, "denied by bucket policy").into_response();
    }
    if label != "improvised" || split != "dev" || file != ORIGIN_FILE {
        return (StatusCode::NOT_FOUND, "no such object").into_response();
    }
    let data: Vec<u8> = (0..100u8).collect();
    match headers.get(header::RANGE).and_then(|v| v.to_str().ok()) {
        Some("bytes=10-19") => Response::builder()
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::CONTENT_LENGTH, "10")
            .header(header::CONTENT_RANGE, "bytes 10-19/100")
            .body(Body::from(data[10..20].to_vec()))
            .unwrap(),
        _ => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::CONTENT_LENGTH, "100")
            .body(Body::from(data))
            .unwrap(),
    }
}

async fn spawn_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let origin = Router::new().route("/{label}/{split}/video/{file}", get(origin_handler));
    tokio::spawn(async move {
        axum::serve(listener, origin).await.unwrap();
    });
    format!("http://{addr}")
}

async fn app_with_origin() -> TestApp {
    let origin = spawn_origin().await;
    build_test_app_with(
        move |mut config| {
            config.media_origin_url = origin;
            config
        },
        |state| state,
    )
    .await
}

#[tokio::test]
async fn remote_forwards_range_and_relays_206() {
    let app = app_with_origin().await;

    let response = get_range(
        &app,
        "/api/v1/media/remote?file_id=V00_S0001_I00000001_P0&label=improvised&split=dev",
        Some("bytes=10-19"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(header_str(&response, header::CONTENT_RANGE), Some("bytes 10-19/100"));
    assert_eq!(header_str(&response, header::ACCEPT_RANGES), Some("bytes"));
    assert_eq!(
        header_str(&response, header::CACHE_CONTROL),
        Some("public, max-age=3600")
    );
    assert_eq!(body_bytes(response).await, (10..20u8).collect::<Vec<_>>());
}

#[tokio::test]
async fn remote_defaults_label_and_split() {
    let app = app_with_origin().await;

    let response = app
        .get("/api/v1/media/remote?fileId=V00_S0001_I00000001_P0")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await.len(), 100);
}

#[tokio::test]
async fn remote_origin_404_is_relayed() {
    let app = app_with_origin().await;

    let response = app
        .get("/api/v1/media/remote?file_id=V00_S0001_I00000009_P0")
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "Video not found: Not Found");
}

#[tokio::test]
async fn remote_error_uses_canonical_reason() {
    let app = app_with_origin().await;

    let response = app
        .get("/api/v1/media/remote?file_id=V00_S0001_I00000008_P0")
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "Video not found: Forbidden");
}

#[tokio::test]
async fn remote_rejects_bad_parameters() {
    let app = build_test_app().await;

    for uri in [
        "/api/v1/media/remote",
        "/api/v1/media/remote?file_id=not-an-id",
        "/api/v1/media/remote?file_id=V00_S0001_I00000001_P0&label=../x",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
    }
}
