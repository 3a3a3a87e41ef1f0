mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_json, build_test_app, build_test_app_with};
use pairlabel_api::router::REQUEST_ID_HEADER;

#[tokio::test]
async fn health_reports_catalog_size() {
    let app = build_test_app().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["catalog_videos"], 3);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_is_degraded_without_manifest() {
    let app = build_test_app_with(
        |mut config| {
            config.manifest_fallback_path = None;
            config
        },
        |state| state,
    )
    .await;

    let json = body_json(app.get("/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["catalog_videos"], 0);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_test_app().await;
    let response = app.get("/health").await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

fn header_values(response: &axum::http::Response<Body>, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[tokio::test]
async fn cross_origin_media_exposes_range_headers() {
    let app = build_test_app().await;
    let response = app
        .send(
            Request::get("/health")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(
        header_values(&response, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://localhost:5173"
    );
    let exposed = header_values(&response, header::ACCESS_CONTROL_EXPOSE_HEADERS);
    for name in ["content-range", "accept-ranges", "content-length", "x-request-id"] {
        assert!(exposed.contains(name), "{name} missing from {exposed}");
    }
}

#[tokio::test]
async fn preflight_allows_range_and_reviewer_headers() {
    let app = build_test_app().await;
    let response = app
        .send(
            Request::options("/api/v1/annotations")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "range,x-reviewer-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = header_values(&response, header::ACCESS_CONTROL_ALLOW_HEADERS);
    assert!(allowed.contains("range"), "{allowed}");
    assert!(allowed.contains("x-reviewer-id"), "{allowed}");
    assert!(header_values(&response, header::ACCESS_CONTROL_ALLOW_METHODS).contains("delete"));
    assert_eq!(header_values(&response, header::ACCESS_CONTROL_MAX_AGE), "3600");
}

#[tokio::test]
async fn unknown_origin_gets_no_cors_grant() {
    let app = build_test_app().await;
    let response = app
        .send(
            Request::get("/health")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_test_app().await;
    let response = app.get("/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
