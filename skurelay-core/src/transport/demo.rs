//! Offline demo upstream for development mode.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::GraphqlTransport;
use crate::errors::LookupError;
use crate::outcome::UpstreamReply;
use crate::query::GraphqlRequest;

/// Answers product queries from a small in-memory catalog.
///
/// Replies use the same GraphQL body shape as the real storefront, so the
/// full classification pipeline runs unchanged in development mode.
#[derive(Debug, Clone)]
pub struct DemoTransport {
    catalog: Vec<Value>,
}

impl DemoTransport {
    /// Creates a demo transport with the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(vec![
            demo_product("Shaker Interior Door", "DR-SHK-3068", 189.0),
            demo_product("Colonial Base Moulding 8ft", "MLD-CB-358", 14.75),
            demo_product("Craftsman Door Casing Kit", "CSG-CRF-KIT", 62.5),
            demo_product("Oak Stair Tread", "STR-OAK-36", 48.0),
        ])
    }

    /// Creates a demo transport serving the given product objects.
    ///
    /// Products are matched on their `sku` field.
    pub fn with_catalog(catalog: Vec<Value>) -> Self {
        Self { catalog }
    }

    /// SKUs available in this catalog.
    pub fn skus(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter_map(|product| product.get("sku").and_then(Value::as_str))
            .collect()
    }
}

impl Default for DemoTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn demo_product(name: &str, sku: &str, price: f64) -> Value {
    json!({
        "name": name,
        "sku": sku,
        "price_range": {
            "minimum_price": {
                "regular_price": { "value": price, "currency": "USD" }
            }
        }
    })
}

#[async_trait]
impl GraphqlTransport for DemoTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<UpstreamReply, LookupError> {
        let items: Vec<&Value> = self
            .catalog
            .iter()
            .filter(|product| product.get("sku").and_then(Value::as_str) == Some(request.sku()))
            .collect();

        tracing::debug!(sku = request.sku(), matches = items.len(), "Demo catalog lookup");

        let body = json!({ "data": { "products": { "items": items } } });
        Ok(UpstreamReply::ok(serde_json::to_string(&body)?))
    }
}
