//! Shared helpers for integration tests: in-memory SQLite stores and a
//! oneshot HTTP client over the full router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use notesd::http_server::{HttpServer, HttpServerConfig};
use notesd::store::{DatabaseConfig, InsertStrategy, NoteStore};

pub async fn memory_store() -> Arc<NoteStore> {
    let store = NoteStore::connect(&DatabaseConfig::sqlite_memory()).await.unwrap();
    store.migrate().await.unwrap();
    Arc::new(store)
}

pub async fn memory_store_with(strategy: Arc<dyn InsertStrategy>) -> Arc<NoteStore> {
    let store = NoteStore::connect_with_strategy(&DatabaseConfig::sqlite_memory(), strategy)
        .await
        .unwrap();
    store.migrate().await.unwrap();
    Arc::new(store)
}

pub fn router(store: Arc<NoteStore>) -> Router {
    HttpServer::new(store, HttpServerConfig::default()).router()
}

pub fn router_without_escaping(store: Arc<NoteStore>) -> Router {
    let config = HttpServerConfig {
        escape_html: false,
        ..HttpServerConfig::default()
    };
    HttpServer::new(store, config).router()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse { status, headers, json }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::HOST, "notes.local")
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> TestResponse {
    post_raw(router, uri, body.to_string()).await
}

pub async fn post_raw(router: &Router, uri: &str, body: impl Into<String>) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::HOST, "notes.local")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    send(router, request).await
}

/// Notes currently returned by `list`
pub async fn list(router: &Router) -> Vec<Value> {
    let response = get(router, "/?action=list").await;
    assert_eq!(response.status, StatusCode::OK);
    response.json["data"].as_array().cloned().unwrap_or_default()
}

/// Create a note through the API and return its id
pub async fn create(router: &Router, title: &str, body: &str) -> i64 {
    let response = post(
        router,
        "/?action=create",
        serde_json::json!({"title": title, "body": body}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "create failed: {}", response.json);
    response.json["data"]["id"].as_i64().unwrap()
}
