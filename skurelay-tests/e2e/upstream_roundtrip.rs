//! Full round trip: HTTP client -> relay server -> fake GraphQL upstream.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use parking_lot::Mutex;
use serde_json::{Value, json};
use skurelay_core::{HttpTransport, PRODUCT_BY_SKU_QUERY, ProductRelay, UpstreamConfig};
use skurelay_web::{AppState, build_router};
use tokio::net::TcpListener;

/// Requests seen by the fake upstream: content type and JSON body.
type Seen = Arc<Mutex<Vec<(String, Value)>>>;

fn door() -> Value {
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

async fn fake_graphql(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let sku = body["variables"]["sku"].as_str().unwrap_or_default().to_string();
    seen.lock().push((content_type, body));

    match sku.as_str() {
        "ABC123" => Json(json!({ "data": { "products": { "items": [door()] } } })).into_response(),
        "DOWN" => (StatusCode::SERVICE_UNAVAILABLE, "upstream maintenance").into_response(),
        "BAD" => Json(json!({ "errors": [{ "message": "Bad filter" }] })).into_response(),
        "GARBLED" => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => Json(json!({ "data": { "products": { "items": [] } } })).into_response(),
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Starts the fake upstream and a relay pointed at it.
async fn start_stack() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::default();
    let upstream = Router::new()
        .route("/graphql", post(fake_graphql))
        .with_state(seen.clone());
    let upstream_addr = spawn(upstream).await;

    let config = UpstreamConfig {
        endpoint: format!("http://{upstream_addr}/graphql"),
        ..Default::default()
    };
    let relay = ProductRelay::new(Arc::new(HttpTransport::new(&config).unwrap()));
    let relay_addr = spawn(build_router(AppState::new(relay))).await;

    (relay_addr, seen)
}

async fn fetch(relay_addr: SocketAddr, path: &str) -> (StatusCode, String, Value) {
    let response = reqwest::get(format!("http://{relay_addr}{path}")).await.unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    (status, content_type, response.json().await.unwrap())
}

#[tokio::test]
async fn test_found_product_round_trip() {
    let (relay_addr, seen) = start_stack().await;

    let (status, content_type, body) = fetch(relay_addr, "/api/ABC123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(body, json!({ "success": true, "product": door() }));

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let (upstream_content_type, upstream_body) = &seen[0];
    assert_eq!(upstream_content_type, "application/json");
    assert_eq!(
        upstream_body,
        &json!({ "query": PRODUCT_BY_SKU_QUERY, "variables": { "sku": "ABC123" } })
    );
}

#[tokio::test]
async fn test_upstream_outage_round_trip() {
    let (relay_addr, _seen) = start_stack().await;

    let (status, _, body) = fetch(relay_addr, "/api/DOWN").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Network error: 503 Service Unavailable" })
    );
}

#[tokio::test]
async fn test_graphql_error_round_trip() {
    let (relay_addr, _seen) = start_stack().await;

    let (status, _, body) = fetch(relay_addr, "/api/BAD").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Bad filter" }));
}

#[tokio::test]
async fn test_not_found_round_trip() {
    let (relay_addr, _seen) = start_stack().await;

    let (status, _, body) = fetch(relay_addr, "/api/XYZ-999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "error": "No product found with SKU: XYZ-999" })
    );
}

#[tokio::test]
async fn test_garbled_upstream_round_trip() {
    let (relay_addr, _seen) = start_stack().await;

    let (status, _, body) = fetch(relay_addr, "/api/GARBLED").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_missing_sku_never_reaches_upstream() {
    let (relay_addr, seen) = start_stack().await;

    let (status, _, body) = fetch(relay_addr, "/api").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "No SKU provided" }));
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn test_unreachable_upstream_is_internal_fault() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = listener.local_addr().unwrap();
    drop(listener);

    let config = UpstreamConfig {
        endpoint: format!("http://{dead_addr}/graphql"),
        ..Default::default()
    };
    let relay = ProductRelay::new(Arc::new(HttpTransport::new(&config).unwrap()));
    let relay_addr = spawn(build_router(AppState::new(relay))).await;

    let (status, _, body) = fetch(relay_addr, "/api/ABC123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}
