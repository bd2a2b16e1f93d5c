//! SKU Relay Web - JSON API server
//!
//! Exposes the product relay as `GET /api/{sku}` so browser clients can look
//! up storefront products without cross-origin requests.

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, build_router, run_server};
