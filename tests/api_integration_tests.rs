//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use todos_cache::api::{create_router, OWNER_HEADER};
use todos_cache::cache::{CacheStats, InMemoryTier};
use todos_cache::source::StubSource;
use todos_cache::{AccessSettings, AppState, CacheAsideLayer};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let layer = CacheAsideLayer::new(
        AccessSettings::default(),
        CacheStats::new(),
        Arc::new(StubSource::default()),
    )
    .with_distributed(Arc::new(InMemoryTier::new()));
    create_router(AppState::new(layer))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn list_request(owner: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/todos")
        .header(OWNER_HEADER, owner)
        .body(Body::empty())
        .unwrap()
}

fn create_request(owner: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/todos")
        .header(OWNER_HEADER, owner)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete_request(owner: &str, id: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/todos/{}", id))
        .header(OWNER_HEADER, owner)
        .body(Body::empty())
        .unwrap()
}

async fn cache_stats(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_to_json(response.into_body()).await
}

// == List Endpoint Tests ==

#[tokio::test]
async fn test_list_returns_seeded_items() {
    let app = create_test_app();

    let response = app.oneshot(list_request("alice")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item["ownerKey"] == "alice"));
    assert!(items.iter().all(|item| item["createdAt"].is_string()));
}

#[tokio::test]
async fn test_list_without_owner_is_unauthorized() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/todos").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Unauthorized");
    assert!(json["timestamp"].is_string());
}

// == Create Endpoint Tests ==

#[tokio::test]
async fn test_create_endpoint_success() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(create_request("alice", r#"{"content":" buy milk "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], 4);
    assert_eq!(json["content"], "buy milk");
    assert_eq!(json["ownerKey"], "alice");

    let response = app.oneshot(list_request("alice")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_empty_content() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(create_request("alice", r#"{"content":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Todo content is required");

    let stats = cache_stats(&app).await;
    assert_eq!(stats["statistics"]["sets"], 0);
    assert_eq!(stats["status"], "idle");
}

#[tokio::test]
async fn test_create_missing_content_field() {
    let app = create_test_app();

    let response = app.oneshot(create_request("alice", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(create_request("alice", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Bad request");
    assert!(json["message"].is_string());
    assert!(json["timestamp"].is_string());

    let stats = cache_stats(&app).await;
    assert_eq!(stats["statistics"]["total"], 0);
}

#[tokio::test]
async fn test_non_json_content_type() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/todos")
                .header(OWNER_HEADER, "alice")
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"content":"plain"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Bad request");
    assert!(json["timestamp"].is_string());
}

// == Delete Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    let response = app.clone().oneshot(delete_request("alice", "2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(list_request("alice")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    let ids: Vec<u64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&2));
}

#[tokio::test]
async fn test_delete_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(delete_request("alice", "999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Todo not found");
}

#[tokio::test]
async fn test_delete_endpoint_invalid_id() {
    let app = create_test_app();

    let response = app.oneshot(delete_request("alice", "abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Invalid todo ID");
}

// == Owner Isolation ==

#[tokio::test]
async fn test_owners_do_not_share_collections() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(create_request("alice", r#"{"content":"private"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(list_request("bob")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item["content"] != "private"));
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["service"], "todos-api");
    assert_eq!(json["cache"]["pattern"], "Cache-Aside");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_cache_statistics_after_reads() {
    let app = create_test_app();

    for _ in 0..3 {
        let response = app.clone().oneshot(list_request("alice")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = cache_stats(&app).await;
    let stats = &json["statistics"];
    assert_eq!(json["status"], "active");
    assert_eq!(stats["hits"], 2);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["sets"], 1);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["hitRatio"], 66.67);
    assert_eq!(stats["pattern"], "Cache-Aside");
}

#[tokio::test]
async fn test_trace_header_accepted() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/todos")
                .header(OWNER_HEADER, "alice")
                .header("x-b3-traceid", "463ac35c9f6413ad")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"content":"traced"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}
