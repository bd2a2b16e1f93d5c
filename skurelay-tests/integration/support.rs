//! Shared helpers for router-level tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::{Value, json};
use skurelay_core::ProductRelay;
use skurelay_core::transport::StubTransport;
use skurelay_web::{AppState, build_router};
use tower::ServiceExt;

/// Router backed by `stub`, plus a handle to inspect calls.
pub fn router_with(stub: StubTransport) -> (Router, Arc<StubTransport>) {
    let stub = Arc::new(stub);
    let relay = ProductRelay::new(stub.clone());
    (build_router(AppState::new(relay)), stub)
}

/// Sends `GET path` through the router.
pub async fn get(router: Router, path: &str) -> Response<Body> {
    router
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Reads the full body as bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Sends `GET path` and returns status, content type and parsed body.
pub async fn get_json(router: Router, path: &str) -> (StatusCode, String, Value) {
    let response = get(router, path).await;
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = serde_json::from_slice(&body_bytes(response).await).unwrap();
    (status, content_type, body)
}

/// The product used throughout the contract tests.
pub fn door() -> Value {
    json!({
        "name": "Door",
        "sku": "ABC123",
        "price_range": {
            "minimum_price": {
                "regular_price": { "value": 99.5, "currency": "USD" }
            }
        }
    })
}

/// GraphQL body listing `items`.
pub fn items_body(items: Vec<Value>) -> Value {
    json!({ "data": { "products": { "items": items } } })
}
