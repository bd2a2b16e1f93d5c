//! Classification of raw upstream replies.
//!
//! Everything the upstream can say is folded into [`UpstreamOutcome`] in one
//! place, so the relay only has to match on four variants.

use serde_json::Value;

use crate::errors::LookupError;

/// Raw HTTP reply from the upstream, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase for the status (may be empty)
    pub status_text: String,
    /// Response body as received
    pub body: String,
}

impl UpstreamReply {
    /// Creates a 200 OK reply with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// Creates a reply with an arbitrary status and body.
    pub fn with_status(
        status: u16,
        status_text: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Checks if the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single entry of a GraphQL `errors` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphqlError {
    pub message: Option<String>,
}

/// What the upstream reply means for the lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    /// Upstream answered outside the 2xx range.
    TransportError { status: u16, status_text: String },
    /// Upstream reported GraphQL errors; never empty.
    ApplicationError(Vec<GraphqlError>),
    /// No product matched.
    Empty,
    /// First matching product, exactly as the upstream sent it.
    Found(Value),
}

impl UpstreamOutcome {
    /// Classifies a raw reply.
    ///
    /// # Errors
    /// - `LookupError::Internal` - Body is not JSON, or not a JSON object
    pub fn classify(reply: UpstreamReply) -> Result<Self, LookupError> {
        if !reply.is_success() {
            return Ok(Self::TransportError {
                status: reply.status,
                status_text: reply.status_text,
            });
        }

        let body: Value = serde_json::from_str(&reply.body)?;
        Self::classify_body(body)
    }

    /// Classifies an already parsed 2xx body.
    ///
    /// # Errors
    /// - `LookupError::Internal` - Body is not a JSON object
    pub fn classify_body(body: Value) -> Result<Self, LookupError> {
        let Value::Object(mut body) = body else {
            return Err(LookupError::internal(
                "Unexpected upstream response: expected a JSON object",
            ));
        };

        match body.get("errors") {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) if entries.is_empty() => {}
            Some(Value::Array(entries)) => {
                let errors = entries
                    .iter()
                    .map(|entry| GraphqlError {
                        message: entry
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                    .collect();
                return Ok(Self::ApplicationError(errors));
            }
            // Present but not a list: still an error report, just without messages.
            Some(_) => {
                return Ok(Self::ApplicationError(vec![GraphqlError { message: None }]));
            }
        }

        let first_item = body
            .get_mut("data")
            .and_then(|data| data.pointer_mut("/products/items"))
            .and_then(Value::as_array_mut)
            .filter(|items| !items.is_empty())
            .map(|items| items.swap_remove(0));

        Ok(match first_item {
            Some(product) => Self::Found(product),
            None => Self::Empty,
        })
    }

    /// Resolves the outcome into the product or the caller-facing error.
    ///
    /// # Errors
    /// - `LookupError::Transport` - Upstream status was not 2xx
    /// - `LookupError::Graphql` - Upstream reported errors
    /// - `LookupError::NotFound` - No product matched `sku`
    pub fn into_product(self, sku: &str) -> Result<Value, LookupError> {
        match self {
            Self::TransportError {
                status,
                status_text,
            } => Err(LookupError::Transport {
                status,
                status_text,
            }),
            Self::ApplicationError(errors) => Err(LookupError::graphql(
                errors.first().and_then(|e| e.message.as_deref()),
            )),
            Self::Empty => Err(LookupError::NotFound {
                sku: sku.to_string(),
            }),
            Self::Found(product) => Ok(product),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn door() -> Value {
        json!({
            "name": "Door",
            "sku": "ABC123",
            "price_range": {
                "minimum_price": {
                    "regular_price": { "value": 99.5, "currency": "USD" }
                }
            }
        })
    }

    #[test]
    fn test_non_success_status_skips_body() {
        let reply = UpstreamReply::with_status(503, "Service Unavailable", "<html>");
        assert_eq!(
            UpstreamOutcome::classify(reply).unwrap(),
            UpstreamOutcome::TransportError {
                status: 503,
                status_text: "Service Unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_errors_take_precedence_over_data() {
        let body = json!({
            "errors": [{ "message": "Bad filter" }, { "message": "second" }],
            "data": { "products": { "items": [door()] } }
        });
        let outcome = UpstreamOutcome::classify_body(body).unwrap();

        assert_eq!(
            outcome.clone().into_product("ABC123"),
            Err(LookupError::graphql(Some("Bad filter")))
        );
        let UpstreamOutcome::ApplicationError(errors) = outcome else {
            panic!("expected application error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let outcome = UpstreamOutcome::classify_body(json!({ "errors": [{}] })).unwrap();
        let err = outcome.into_product("ABC123").unwrap_err();
        assert_eq!(err.to_string(), "GraphQL error occurred");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_empty_errors_list_is_ignored() {
        let body = json!({ "errors": [], "data": { "products": { "items": [door()] } } });
        assert_eq!(
            UpstreamOutcome::classify_body(body).unwrap(),
            UpstreamOutcome::Found(door())
        );
    }

    #[test]
    fn test_missing_or_empty_items_is_empty() {
        for body in [
            json!({}),
            json!({ "data": null }),
            json!({ "data": { "products": null } }),
            json!({ "data": { "products": { "items": [] } } }),
            json!({ "data": { "products": { "items": "nope" } } }),
        ] {
            assert_eq!(
                UpstreamOutcome::classify_body(body).unwrap(),
                UpstreamOutcome::Empty
            );
        }
    }

    #[test]
    fn test_first_item_passes_through_verbatim() {
        let mut extra = door();
        extra["stock_status"] = json!("IN_STOCK");
        let body = json!({ "data": { "products": { "items": [extra.clone(), door()] } } });

        let product = UpstreamOutcome::classify_body(body)
            .unwrap()
            .into_product("ABC123")
            .unwrap();
        assert_eq!(product, extra);
    }

    #[test]
    fn test_not_found_carries_exact_sku() {
        let err = UpstreamOutcome::Empty.into_product(" abc 123 ").unwrap_err();
        assert_eq!(err.to_string(), "No product found with SKU:  abc 123 ");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_malformed_bodies_are_internal() {
        let err = UpstreamOutcome::classify(UpstreamReply::ok("{\"data\":")).unwrap_err();
        assert!(err.is_internal());

        let err = UpstreamOutcome::classify(UpstreamReply::ok("[]")).unwrap_err();
        assert!(err.is_internal());
    }
}
