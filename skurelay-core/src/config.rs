//! Centralized configuration for SKU Relay.
//!
//! The relay is configuration-free apart from the upstream endpoint; the
//! remaining knobs only describe how the surrounding server is bound.

use std::net::SocketAddr;
use std::time::Duration;

/// Default upstream GraphQL endpoint.
pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://angelesmillwork.com/graphql";

/// Central configuration for all SKU Relay components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
}

/// Upstream GraphQL service configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// GraphQL endpoint receiving the product query
    pub endpoint: String,
    /// User agent for outbound requests
    pub user_agent: &'static str,
    /// Request timeout (None = transport default)
    pub request_timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_UPSTREAM_ENDPOINT.to_string(),
            user_agent: "skurelay/0.1.0",
            request_timeout: None,
        }
    }
}

/// HTTP server binding configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Resolves the configured host and port into a socket address.
    ///
    /// # Errors
    /// - `std::net::AddrParseError` - Host is not a valid IP address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl RelayConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unset or unparsable variables leave the default in place.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("SKURELAY_UPSTREAM_URL") {
            if !endpoint.is_empty() {
                config.upstream.endpoint = endpoint;
            }
        }

        if let Some(timeout) = lookup("SKURELAY_UPSTREAM_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.upstream.request_timeout = Some(Duration::from_secs(seconds));
            }
        }

        if let Some(host) = lookup("SKURELAY_HOST") {
            if !host.is_empty() {
                config.server.host = host;
            }
        }

        if let Some(port) = lookup("SKURELAY_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        config
    }
}
