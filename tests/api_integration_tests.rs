//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles, including tag invalidation.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tag_cache::{api::create_router, AppState, MemoryStore};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(Arc::new(MemoryStore::new()), 0))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn put(app: &Router, key: &str, value: Value, tags: &[&str]) {
    let (status, _) = request(
        app,
        "PUT",
        "/set",
        Some(json!({"key": key, "value": value, "tags": tags})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// == SET / GET ==

#[tokio::test]
async fn test_set_and_get_json_value() {
    let app = create_test_app();

    let (status, json) = request(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "user:1", "value": {"name": "Ada"}, "tags": ["users"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("user:1"));
    assert_eq!(json["tags"], json!(["users"]));

    let (status, json) = request(&app, "GET", "/get/user:1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], json!({"name": "Ada"}));
}

#[tokio::test]
async fn test_get_falsy_value_is_not_found() {
    let app = create_test_app();
    put(&app, "flag", json!(false), &[]).await;

    let (status, json) = request(&app, "GET", "/get/flag", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let (status, json) = request(&app, "PUT", "/set", Some(json!({"key": "", "value": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_overlong_tag_rejected() {
    let app = create_test_app();
    let tag = "t".repeat(240);

    let (status, json) = request(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "k", "value": 1, "tags": [tag]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Tag"));

    let (status, _) = request(&app, "GET", "/get/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Tag Invalidation ==

#[tokio::test]
async fn test_delete_tag_removes_members() {
    let app = create_test_app();
    put(&app, "a", json!(1), &["x", "y"]).await;
    put(&app, "b", json!(2), &["x"]).await;
    put(&app, "c", json!(3), &["z"]).await;

    let (status, json) = request(&app, "GET", "/tags/x", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keys"], json!(["a", "b"]));

    let (status, _) = request(&app, "DELETE", "/tags/x", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(request(&app, "GET", "/get/a", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(request(&app, "GET", "/get/b", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(request(&app, "GET", "/get/c", None).await.0, StatusCode::OK);

    // "y" still lists the already-deleted key.
    let (_, json) = request(&app, "GET", "/tags/y", None).await;
    assert_eq!(json["keys"], json!(["a"]));

    let (_, json) = request(&app, "GET", "/tags/x", None).await;
    assert_eq!(json["keys"], json!([]));
}

#[tokio::test]
async fn test_bulk_invalidate() {
    let app = create_test_app();
    put(&app, "a", json!(1), &["x"]).await;
    put(&app, "b", json!(2), &["y"]).await;
    put(&app, "c", json!(3), &["z"]).await;

    let (status, json) = request(
        &app,
        "POST",
        "/tags/invalidate",
        Some(json!({"tags": ["x", "y", "never-used"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tags"], json!(["x", "y", "never-used"]));

    assert_eq!(request(&app, "GET", "/get/a", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(request(&app, "GET", "/get/b", None).await.0, StatusCode::NOT_FOUND);
    assert_eq!(request(&app, "GET", "/get/c", None).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_key_keeps_tag_index() {
    let app = create_test_app();
    put(&app, "a", json!(1), &["x"]).await;

    let (status, _) = request(&app, "DELETE", "/del/a", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "DELETE", "/del/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = request(&app, "GET", "/tags/x", None).await;
    assert_eq!(json["keys"], json!(["a"]));

    // Invalidating the stale index is still fine.
    let (status, _) = request(&app, "DELETE", "/tags/x", None).await;
    assert_eq!(status, StatusCode::OK);
}

// == Stats / Health ==

#[tokio::test]
async fn test_stats_endpoint_counts_index_entries() {
    let app = create_test_app();
    put(&app, "a", json!(1), &["x"]).await;
    request(&app, "GET", "/get/a", None).await;
    request(&app, "GET", "/get/missing", None).await;

    let (status, json) = request(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_entries"], 2);
    assert!(json["hits"].as_u64().unwrap() >= 1);
    assert!(json["misses"].as_u64().unwrap() >= 1);
    assert!(json.get("hit_rate").is_some());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let (status, _) = request(
        &app,
        "PUT",
        "/set",
        Some(json!({"key": "short", "value": "v", "ttl": 1, "tags": ["t"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(request(&app, "GET", "/get/short", None).await.0, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(request(&app, "GET", "/get/short", None).await.0, StatusCode::NOT_FOUND);
    let (_, json) = request(&app, "GET", "/tags/t", None).await;
    assert_eq!(json["keys"], json!(["short"]));
}
