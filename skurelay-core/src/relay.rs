//! The product lookup relay.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use crate::config::RelayConfig;
use crate::errors::LookupError;
use crate::mode::RuntimeMode;
use crate::outcome::UpstreamOutcome;
use crate::query::GraphqlRequest;
use crate::response::LookupResponse;
use crate::transport::{DemoTransport, GraphqlTransport, HttpTransport};

/// Relays SKU lookups to the upstream and normalizes the result.
///
/// Holds no per-request state; clones share the same transport.
#[derive(Debug, Clone)]
pub struct ProductRelay {
    transport: Arc<dyn GraphqlTransport>,
}

impl ProductRelay {
    /// Creates a relay over an arbitrary transport.
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }

    /// Creates the relay appropriate for a runtime mode.
    ///
    /// # Errors
    /// - `LookupError::Internal` - Production transport could not be built
    pub fn from_config(config: &RelayConfig, mode: RuntimeMode) -> Result<Self, LookupError> {
        let transport: Arc<dyn GraphqlTransport> = match mode {
            RuntimeMode::Production => {
                let http = HttpTransport::new(&config.upstream)?;
                tracing::info!(endpoint = %http.endpoint(), "Relaying to upstream GraphQL");
                Arc::new(http)
            }
            RuntimeMode::Development => {
                let demo = DemoTransport::new();
                tracing::info!(skus = ?demo.skus(), "Answering from demo catalog");
                Arc::new(demo)
            }
        };
        Ok(Self::new(transport))
    }

    /// Looks up a product by SKU.
    ///
    /// Never fails: every outcome, including panics inside the transport, is
    /// folded into a [`LookupResponse`]. Internal faults are logged once at
    /// error level; every other failure is a routine outcome.
    pub async fn lookup(&self, sku: Option<&str>) -> LookupResponse {
        let result = match AssertUnwindSafe(self.resolve(sku)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(LookupError::internal(panic_message(payload.as_ref()))),
        };

        match &result {
            Ok(_) => tracing::debug!(sku = sku.unwrap_or_default(), "Product found"),
            Err(err) if err.is_internal() => {
                tracing::error!(
                    sku = sku.unwrap_or_default(),
                    error = %err,
                    "Error fetching product"
                )
            }
            Err(err) => {
                tracing::debug!(
                    sku = sku.unwrap_or_default(),
                    status = err.status_code(),
                    error = %err,
                    "Lookup failed"
                )
            }
        }

        result.into()
    }

    async fn resolve(&self, sku: Option<&str>) -> Result<Value, LookupError> {
        let sku = sku
            .filter(|sku| !sku.is_empty())
            .ok_or(LookupError::MissingSku)?;

        let request = GraphqlRequest::product_by_sku(sku);
        let reply = self.transport.execute(&request).await?;

        UpstreamOutcome::classify(reply)?.into_product(sku)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use super::*;
    use crate::outcome::UpstreamReply;
    use crate::transport::StubTransport;

    /// Counts events at one level.
    struct LevelCounter(Level, Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for LevelCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == self.0 {
                self.1.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn relay_with(stub: StubTransport) -> (ProductRelay, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        (ProductRelay::new(stub.clone()), stub)
    }

    fn door() -> Value {
        json!({
            "name": "Door",
            "sku": "ABC123",
            "price_range": {
                "minimum_price": { "regular_price": { "value": 99.5, "currency": "USD" } }
            }
        })
    }

    #[tokio::test]
    async fn test_missing_sku_never_calls_upstream() {
        let (relay, stub) = relay_with(StubTransport::json(json!({})));

        for sku in [None, Some("")] {
            let response = relay.lookup(sku).await;
            assert_eq!(response.status(), 400);
            assert_eq!(
                response.body(),
                json!({ "success": false, "error": "No SKU provided" })
            );
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sku_is_bound_as_variable() {
        let (relay, stub) = relay_with(StubTransport::json(json!({})));

        relay.lookup(Some("ABC123")).await;

        let request = stub.last_request().unwrap();
        assert_eq!(request, GraphqlRequest::product_by_sku("ABC123"));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_found_product() {
        let (relay, _stub) = relay_with(StubTransport::json(
            json!({ "data": { "products": { "items": [door()] } } }),
        ));

        let response = relay.lookup(Some("ABC123")).await;
        assert_eq!(response, LookupResponse::Found { product: door() });
    }

    #[tokio::test]
    async fn test_upstream_status_is_mirrored() {
        let (relay, _stub) = relay_with(StubTransport::replying(UpstreamReply::with_status(
            503,
            "Service Unavailable",
            "",
        )));

        let response = relay.lookup(Some("ABC123")).await;
        assert_eq!(
            response,
            LookupResponse::Failed {
                status: 503,
                error: "Network error: 503 Service Unavailable".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let (relay, _stub) = relay_with(StubTransport::json(
            json!({ "data": { "products": { "items": [] } } }),
        ));

        let response = relay.lookup(Some("ABC123")).await;
        assert_eq!(response.status(), 404);
        assert_eq!(response.body()["error"], "No product found with SKU: ABC123");
    }

    #[tokio::test]
    async fn test_transport_fault_is_logged_once() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(LevelCounter(Level::ERROR, errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let (relay, _stub) = relay_with(StubTransport::failing("connection reset by peer"));
        let response = relay.lookup(Some("ABC123")).await;

        assert_eq!(
            response,
            LookupResponse::Failed {
                status: 500,
                error: "connection reset by peer".to_string()
            }
        );
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_routine_failures_are_not_logged_as_errors() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(LevelCounter(Level::ERROR, errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let (relay, _stub) = relay_with(StubTransport::json(json!({ "errors": [{}] })));
        relay.lookup(Some("ABC123")).await;
        relay.lookup(None).await;

        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_fault() {
        let (relay, _stub) = relay_with(StubTransport::panicking("upstream exploded"));

        let response = relay.lookup(Some("ABC123")).await;
        assert_eq!(response.status(), 500);
        assert_eq!(response.body()["error"], "upstream exploded");
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal() {
        let (relay, _stub) = relay_with(StubTransport::replying(UpstreamReply::ok("<html>")));

        let response = relay.lookup(Some("ABC123")).await;
        assert_eq!(response.status(), 500);
        assert_eq!(response.body()["success"], false);
    }

    #[tokio::test]
    async fn test_development_mode_uses_demo_catalog() {
        let relay =
            ProductRelay::from_config(&RelayConfig::default(), RuntimeMode::Development).unwrap();

        assert!(relay.lookup(Some("STR-OAK-36")).await.is_success());
        assert_eq!(relay.lookup(Some("ABC123")).await.status(), 404);
    }

    #[test]
    fn test_from_config_announces_selected_upstream() {
        for mode in [RuntimeMode::Production, RuntimeMode::Development] {
            let infos = Arc::new(AtomicUsize::new(0));
            let subscriber =
                tracing_subscriber::registry().with(LevelCounter(Level::INFO, infos.clone()));
            let _guard = tracing::subscriber::set_default(subscriber);

            ProductRelay::from_config(&RelayConfig::default(), mode).unwrap();
            assert_eq!(infos.load(Ordering::SeqCst), 1, "{mode}");
        }
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u32), "");
    }
}
