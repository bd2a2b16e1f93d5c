//! Integration tests for fault reporting
//!
//! Only internal faults reach the log sink; every routine failure stays quiet.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::StatusCode;
use serde_json::json;
use skurelay_core::transport::StubTransport;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

use crate::support::{get_json, items_body, router_with};

/// Counts error-level events emitted by the relay.
#[derive(Clone, Default)]
struct FaultCounter(Arc<AtomicUsize>);

impl FaultCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for FaultCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR
            && event.metadata().target().starts_with("skurelay_core")
        {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn test_transport_exception_is_logged_exactly_once() {
    let counter = FaultCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

    let (router, _stub) = router_with(StubTransport::failing("dns error: no such host"));
    let (status, _, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "error": "dns error: no such host" })
    );
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_panicking_transport_is_contained_and_logged_once() {
    let counter = FaultCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

    let (router, _stub) = router_with(StubTransport::panicking("transport bug"));
    let (status, content_type, body) = get_json(router, "/api/ABC123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type, "application/json");
    assert_eq!(body, json!({ "success": false, "error": "transport bug" }));
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_expected_failures_are_not_logged() {
    let counter = FaultCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

    let (router, _stub) = router_with(StubTransport::json(items_body(vec![])));
    get_json(router.clone(), "/api/ABC123").await;
    get_json(router, "/api").await;

    let (router, _stub) = router_with(StubTransport::json(json!({ "errors": [{}] })));
    get_json(router, "/api/ABC123").await;

    assert_eq!(counter.count(), 0);
}
