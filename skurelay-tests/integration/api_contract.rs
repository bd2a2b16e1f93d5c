//! Integration tests for the `/api/{sku}` JSON contract

use axum::http::StatusCode;
use serde_json::json;
use skurelay_core::UpstreamReply;
use skurelay_core::transport::StubTransport;

use crate::support::{body_bytes, door, get, get_json, items_body, router_with};

#[tokio::test]
async fn test_missing_sku_returns_400_without_upstream_call() {
    for path in ["/api", "/api/"] {
        let (router, stub) = router_with(StubTransport::json(items_body(vec![door()])));

        let (status, content_type, body) = get_json(router, path).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "path {path}");
        assert_eq!(content_type, "application/json");
        assert_eq!(body, json!({ "success": false, "error": "No SKU provided" }));
        assert_eq!(stub.call_count(), 0);
    }
}

#[tokio::test]
async fn test_found_product_passes_through() {
    let (router, stub) = router_with(StubTransport::json(items_body(vec![door()])));

    let (status, content_type, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(body, json!({ "success": true, "product": door() }));
    assert_eq!(stub.call_count(), 1);
    assert_eq!(stub.last_request().unwrap().sku(), "ABC123");
}

#[tokio::test]
async fn test_upstream_status_is_mirrored() {
    let (router, _stub) = router_with(StubTransport::replying(UpstreamReply::with_status(
        503,
        "Service Unavailable",
        "maintenance",
    )));

    let (status, _, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Network error: 503 Service Unavailable" })
    );
}

#[tokio::test]
async fn test_graphql_error_message() {
    let (router, _stub) =
        router_with(StubTransport::json(json!({ "errors": [{ "message": "Bad filter" }] })));

    let (status, _, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Bad filter" }));
}

#[tokio::test]
async fn test_graphql_error_without_message() {
    let (router, _stub) = router_with(StubTransport::json(json!({ "errors": [{}] })));

    let (status, _, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "GraphQL error occurred" })
    );
}

#[tokio::test]
async fn test_no_items_is_404_with_exact_sku() {
    let (router, _stub) = router_with(StubTransport::json(items_body(vec![])));

    let (status, _, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "error": "No product found with SKU: ABC123" })
    );
}

#[tokio::test]
async fn test_percent_encoded_sku_is_decoded_before_lookup() {
    let (router, stub) = router_with(StubTransport::json(items_body(vec![])));

    let (_, _, body) = get_json(router, "/api/DOOR%2030").await;

    assert_eq!(stub.last_request().unwrap().sku(), "DOOR 30");
    assert_eq!(body["error"], "No product found with SKU: DOOR 30");
}

#[tokio::test]
async fn test_transport_failure_is_500() {
    let (router, _stub) = router_with(StubTransport::failing("error sending request"));

    let (status, _, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "error": "error sending request" })
    );
}

#[tokio::test]
async fn test_malformed_upstream_json_is_500() {
    let (router, _stub) = router_with(StubTransport::replying(UpstreamReply::ok("not json")));

    let (status, content_type, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type, "application/json");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_repeated_lookups_are_byte_identical() {
    let (router, stub) = router_with(StubTransport::json(items_body(vec![door()])));

    let first = body_bytes(get(router.clone(), "/api/ABC123").await).await;
    let second = body_bytes(get(router, "/api/ABC123").await).await;

    assert_eq!(first, second);
    assert_eq!(stub.call_count(), 2);
}
