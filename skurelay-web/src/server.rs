//! HTTP server for the SKU relay.

use axum::Router;
use axum::routing::get;
use skurelay_core::{ProductRelay, RelayConfig, RuntimeMode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{api_product, api_product_without_sku};

/// Shared state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub relay: ProductRelay,
}

impl AppState {
    /// Creates state around an existing relay.
    pub fn new(relay: ProductRelay) -> Self {
        Self { relay }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(api_product_without_sku))
        .route("/api/", get(api_product_without_sku))
        .route("/api/{sku}", get(api_product))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the relay server until interrupted.
///
/// # Errors
/// - Relay construction failed (invalid upstream endpoint)
/// - Configured host/port is not a valid socket address
/// - Listener could not bind or the server failed while running
pub async fn run_server(
    config: RelayConfig,
    mode: RuntimeMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let relay = ProductRelay::from_config(&config, mode)?;
    let app = build_router(AppState::new(relay));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, %mode, "SKU relay listening on http://{}", listener.local_addr()?);
    if mode.is_development() {
        tracing::warn!("Lookups are served from the demo catalog, not the live storefront");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SKU relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
