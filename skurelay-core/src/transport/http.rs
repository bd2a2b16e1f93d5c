//! HTTP transport for the production upstream.

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::{CONTENT_TYPE, HeaderValue};

use super::GraphqlTransport;
use crate::config::UpstreamConfig;
use crate::errors::LookupError;
use crate::outcome::UpstreamReply;
use crate::query::GraphqlRequest;

/// Posts GraphQL requests to a fixed endpoint over HTTP.
///
/// No retries and no backoff: one call in, one POST out. The client is
/// shared, so cloning the transport is cheap.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpTransport {
    /// Creates a transport from upstream configuration.
    ///
    /// # Errors
    /// - `LookupError::Internal` - Endpoint is not a valid URL or the HTTP
    ///   client cannot be built
    pub fn new(config: &UpstreamConfig) -> Result<Self, LookupError> {
        let endpoint = url::Url::parse(&config.endpoint).map_err(|e| {
            LookupError::internal(format!("Invalid upstream endpoint '{}': {e}", config.endpoint))
        })?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// Endpoint this transport posts to.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<UpstreamReply, LookupError> {
        tracing::debug!(endpoint = %self.endpoint, sku = request.sku(), "Posting product query");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        // hyper only records the phrase when it differs from the canonical one.
        let status_text = response
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .or(status.canonical_reason())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Upstream replied");

        Ok(UpstreamReply {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves one HTTP/1.1 exchange answering with a literal status line.
    async fn raw_upstream(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0_u8; 4096];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
                if request_complete(&request) {
                    break;
                }
            }

            let reply = format!(
                "{status_line}\r\nContent-Type: text/plain\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/graphql")
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    async fn reply_from(status_line: &'static str) -> UpstreamReply {
        let config = UpstreamConfig {
            endpoint: raw_upstream(status_line, "unavailable").await,
            request_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        HttpTransport::new(&config)
            .unwrap()
            .execute(&GraphqlRequest::product_by_sku("ABC123"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upstream_reason_phrase_is_kept() {
        let reply = reply_from("HTTP/1.1 503 Backend fetch failed").await;

        assert_eq!(reply.status, 503);
        assert_eq!(reply.status_text, "Backend fetch failed");
        assert_eq!(reply.body, "unavailable");
        assert_eq!(
            LookupError::Transport {
                status: reply.status,
                status_text: reply.status_text
            }
            .to_string(),
            "Network error: 503 Backend fetch failed"
        );
    }

    #[tokio::test]
    async fn test_canonical_reason_phrase_is_reported() {
        let reply = reply_from("HTTP/1.1 503 Service Unavailable").await;

        assert_eq!(reply.status, 503);
        assert_eq!(reply.status_text, "Service Unavailable");
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let config = UpstreamConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(err.is_internal());
        assert!(err.to_string().contains("Invalid upstream endpoint"));
    }

    #[test]
    fn test_uses_configured_endpoint() {
        let config = UpstreamConfig {
            request_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.endpoint().as_str(),
            "https://angelesmillwork.com/graphql"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_internal() {
        // Port 9 (discard) on loopback is closed in test environments.
        let config = UpstreamConfig {
            endpoint: "http://127.0.0.1:9/graphql".to_string(),
            request_timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config).unwrap();

        let err = transport
            .execute(&GraphqlRequest::product_by_sku("ABC123"))
            .await
            .unwrap_err();
        assert!(err.is_internal());
        assert!(!err.to_string().is_empty());
    }
}
