//! Normalized response envelope returned to callers.

use serde_json::{Value, json};

use crate::errors::LookupError;

/// Result of a lookup as seen by the caller.
///
/// The body always carries a `success` flag; failures never expose more than
/// the error message.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResponse {
    /// A product matched the SKU.
    Found { product: Value },
    /// The lookup failed.
    Failed { status: u16, error: String },
}

impl LookupResponse {
    /// HTTP status for this response.
    pub fn status(&self) -> u16 {
        match self {
            LookupResponse::Found { .. } => 200,
            LookupResponse::Failed { status, .. } => *status,
        }
    }

    /// Checks if the lookup found a product.
    pub fn is_success(&self) -> bool {
        matches!(self, LookupResponse::Found { .. })
    }

    /// JSON body for this response.
    pub fn body(&self) -> Value {
        match self {
            LookupResponse::Found { product } => json!({
                "success": true,
                "product": product
            }),
            LookupResponse::Failed { error, .. } => json!({
                "success": false,
                "error": error
            }),
        }
    }
}

impl From<LookupError> for LookupResponse {
    fn from(err: LookupError) -> Self {
        LookupResponse::Failed {
            status: err.status_code(),
            error: err.to_string(),
        }
    }
}

impl From<Result<Value, LookupError>> for LookupResponse {
    fn from(result: Result<Value, LookupError>) -> Self {
        match result {
            Ok(product) => LookupResponse::Found { product },
            Err(err) => err.into(),
        }
    }
}
