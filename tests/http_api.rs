//! Router-level tests for the HTTP orchestration layer

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use datashelf::http::{router, AppState};
use datashelf::storage::MemoryStore;
use datashelf::Config;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to build an app over a seeded in-memory store
fn app_with(keys: &[&str]) -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    for key in keys {
        store.put(key, "content");
    }
    let state = AppState {
        store: Arc::new(store.clone()),
        config: Arc::new(Config::for_tests()),
    };
    (router(state), store)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn presign_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/presign")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn presign_resolves_and_issues_urls() {
    let (app, _) = app_with(&[
        "processed/raw/ocean/foo_raw.csv",
        "processed/metadata/ocean/foo_metadata.json",
    ]);

    let request = presign_request(&serde_json::json!({
        "domain": "ocean",
        "dataset": "foo_raw.csv",
    }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let raw_url = json["raw_url"].as_str().unwrap();
    assert!(raw_url.starts_with("memory://processed/raw/ocean/foo_raw.csv"));
    assert!(json["curated_url"].is_null());
    assert!(json["metadata_url"].as_str().is_some());
    assert_eq!(json["expires_in"], 300);
    assert_eq!(json["missing"], serde_json::json!(["curated"]));

    // Probed keys are reported for every partition, including resolved ones
    let tried = json["tried_keys"].as_object().unwrap();
    assert_eq!(
        tried["raw"][0].as_str().unwrap(),
        "processed/raw/ocean/foo_raw.csv"
    );
    assert!(!tried["curated"].as_array().unwrap().is_empty());
    assert_eq!(
        tried["metadata"][0].as_str().unwrap(),
        "processed/metadata/ocean/foo_metadata.json"
    );
}

#[tokio::test]
async fn presign_honors_ttl_override() {
    let (app, _) = app_with(&["processed/raw/ocean/foo.csv"]);

    let request = presign_request(&serde_json::json!({
        "domain": "ocean",
        "dataset": "foo",
        "expires_in": 60,
    }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["expires_in"], 60);
    assert!(json["raw_url"].as_str().unwrap().contains("expires=60"));
}

#[tokio::test]
async fn presign_rejects_empty_fields() {
    let (app, _) = app_with(&[]);

    let request = presign_request(&serde_json::json!({
        "domain": "ocean",
        "dataset": "  ",
    }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("dataset"));
}

#[tokio::test]
async fn presign_reports_probe_failures_as_server_errors() {
    let (app, store) = app_with(&["processed/raw/ocean/foo_raw.csv"]);
    store.fail_on_prefix("processed/curated/");

    let request = presign_request(&serde_json::json!({
        "domain": "ocean",
        "dataset": "foo_raw.csv",
    }));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("curated"));
}

#[tokio::test]
async fn datasets_lists_base_names() {
    let (app, _) = app_with(&[
        "processed/raw/ocean/a_raw.csv",
        "processed/raw/ocean/b.csv",
        "processed/raw/ocean/nested/c.csv",
    ]);

    let request = Request::builder()
        .uri("/api/datasets/ocean")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(["a", "b"]));
}

#[tokio::test]
async fn datasets_include_curated_flag() {
    let (app, _) = app_with(&[
        "processed/raw/ocean/a_raw.csv",
        "processed/curated/ocean/z_curated.zip",
    ]);

    let request = Request::builder()
        .uri("/api/datasets/ocean?include_curated=true")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(["a", "z"]));
}

#[tokio::test]
async fn proxy_streams_with_disposition_header() {
    let (app, _) = app_with(&["processed/raw/ocean/foo_raw.csv"]);

    let request = Request::builder()
        .uri("/api/proxy?domain=ocean&dataset=foo&which=raw")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"foo_raw.csv\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"content");
}

#[tokio::test]
async fn proxy_missing_object_is_not_found() {
    let (app, _) = app_with(&[]);

    let request = Request::builder()
        .uri("/api/proxy?domain=ocean&dataset=ghost&which=raw")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn proxy_rejects_unknown_partition() {
    let (app, _) = app_with(&[]);

    let request = Request::builder()
        .uri("/api/proxy?domain=ocean&dataset=foo&which=frozen")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn proxy_metadata_uses_derived_base() {
    let (app, _) = app_with(&["processed/metadata/ocean/foo_metadata.json"]);

    let request = Request::builder()
        .uri("/api/proxy?domain=ocean&dataset=foo_raw.csv&which=metadata")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"foo_metadata.json\""
    );
}
