//! HTTP request handlers

pub mod api;

// Re-export handler functions
pub use api::{api_product, api_product_without_sku};
