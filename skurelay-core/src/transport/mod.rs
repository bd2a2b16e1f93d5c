//! Transports that carry the GraphQL request to an upstream.

use async_trait::async_trait;

use crate::errors::LookupError;
use crate::outcome::UpstreamReply;
use crate::query::GraphqlRequest;

pub mod demo;
pub mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod stub;

pub use demo::DemoTransport;
pub use http::HttpTransport;
#[cfg(any(test, feature = "test-utils"))]
pub use stub::StubTransport;

/// Trait for upstream GraphQL transports.
///
/// Implementations perform exactly one request per call and report whatever
/// status and body came back; interpreting them is the relay's job.
#[async_trait]
pub trait GraphqlTransport: Send + Sync + std::fmt::Debug {
    /// Sends the request and returns the raw reply.
    ///
    /// # Errors
    /// - `LookupError::Internal` - No reply could be obtained (connection
    ///   failure, timeout, unreadable body)
    async fn execute(&self, request: &GraphqlRequest) -> Result<UpstreamReply, LookupError>;
}
