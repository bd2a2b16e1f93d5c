//! Error taxonomy for product lookups.

use thiserror::Error;

/// Fallback message when the upstream reports an error without a message.
pub const GRAPHQL_ERROR_FALLBACK: &str = "GraphQL error occurred";

/// Fallback message when an internal fault carries no message of its own.
pub const UNKNOWN_ERROR_FALLBACK: &str = "An unknown error occurred";

/// Every way a lookup can fail.
///
/// The `Display` output of each variant is exactly the `error` string sent
/// back to the caller, so callers never see a different wording than the one
/// produced here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The request carried no SKU, or an empty one.
    #[error("No SKU provided")]
    MissingSku,

    /// The upstream answered with a non-2xx HTTP status.
    #[error("Network error: {status} {status_text}")]
    Transport {
        /// Upstream HTTP status code
        status: u16,
        /// Reason phrase for the status
        status_text: String,
    },

    /// The upstream answered 2xx but reported GraphQL errors in the body.
    #[error("{message}")]
    Graphql {
        /// Message of the first reported error
        message: String,
    },

    /// The upstream found no product for the SKU.
    #[error("No product found with SKU: {sku}")]
    NotFound {
        /// The SKU exactly as requested
        sku: String,
    },

    /// Anything unclassified: transport exceptions, malformed JSON, panics.
    #[error("{reason}")]
    Internal {
        /// Description of the fault
        reason: String,
    },
}

impl LookupError {
    /// Creates a GraphQL error, falling back to a generic message.
    pub fn graphql(message: Option<&str>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or(GRAPHQL_ERROR_FALLBACK);
        Self::Graphql {
            message: message.to_string(),
        }
    }

    /// Creates an internal fault, falling back to a generic message.
    pub fn internal(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.is_empty() {
            Self::Internal {
                reason: UNKNOWN_ERROR_FALLBACK.to_string(),
            }
        } else {
            Self::Internal { reason }
        }
    }

    /// HTTP status code reported to the caller for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::MissingSku => 400,
            LookupError::Transport { status, .. } => *status,
            LookupError::Graphql { .. } => 400,
            LookupError::NotFound { .. } => 404,
            LookupError::Internal { .. } => 500,
        }
    }

    /// Checks if this error is an unexpected fault worth an operator's attention.
    pub fn is_internal(&self) -> bool {
        matches!(self, LookupError::Internal { .. })
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err.to_string())
    }
}
