//! GraphQL request document for product lookups.

use serde::{Deserialize, Serialize};

/// Product lookup by exact SKU.
///
/// The SKU only ever travels in the `$sku` variable; the document text itself
/// is constant.
pub const PRODUCT_BY_SKU_QUERY: &str = r#"
  query GetProductBySku($sku: String!) {
    products(filter: { sku: { eq: $sku } }) {
      items {
        name
        sku
        price_range {
          minimum_price {
            regular_price {
              value
              currency
            }
          }
        }
      }
    }
  }
"#;

/// Variables bound to [`PRODUCT_BY_SKU_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariables {
    pub sku: String,
}

/// Body of the POST sent to the upstream GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: ProductVariables,
}

impl GraphqlRequest {
    /// Builds the product lookup request for a SKU.
    pub fn product_by_sku(sku: &str) -> Self {
        Self {
            query: PRODUCT_BY_SKU_QUERY.to_string(),
            variables: ProductVariables {
                sku: sku.to_string(),
            },
        }
    }

    /// SKU bound to this request.
    pub fn sku(&self) -> &str {
        &self.variables.sku
    }
}
