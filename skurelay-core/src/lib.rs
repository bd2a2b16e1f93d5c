//! SKU Relay Core - Product lookup relay
//!
//! Translates an inbound SKU lookup into a single GraphQL request against the
//! upstream storefront and normalizes whatever comes back into a JSON envelope
//! that always carries a `success` flag.

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod config;
pub mod errors;
pub mod mode;
pub mod outcome;
pub mod query;
pub mod relay;
pub mod response;
pub mod tracing_setup;
pub mod transport;

// Re-export main types for convenient access
pub use config::{RelayConfig, ServerConfig, UpstreamConfig};
pub use errors::LookupError;
pub use mode::RuntimeMode;
pub use outcome::{UpstreamOutcome, UpstreamReply};
pub use query::{GraphqlRequest, PRODUCT_BY_SKU_QUERY};
pub use relay::ProductRelay;
pub use response::LookupResponse;
pub use transport::{DemoTransport, GraphqlTransport, HttpTransport};

pub type Result<T> = std::result::Result<T, LookupError>;
