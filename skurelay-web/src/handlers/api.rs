//! API handlers for product lookups

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use skurelay_core::LookupResponse;

use crate::server::AppState;

/// `GET /api/{sku}`
pub async fn api_product(
    State(state): State<AppState>,
    sku: Result<Path<String>, PathRejection>,
) -> Response {
    let response = match sku {
        Ok(Path(sku)) => state.relay.lookup(Some(&sku)).await,
        // Keep the JSON envelope even when the path itself is unusable.
        Err(rejection) => LookupResponse::Failed {
            status: rejection.status().as_u16(),
            error: rejection.body_text(),
        },
    };

    into_http_response(response)
}

/// `GET /api` with no SKU segment.
pub async fn api_product_without_sku(State(state): State<AppState>) -> Response {
    into_http_response(state.relay.lookup(None).await)
}

fn into_http_response(response: LookupResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body())).into_response()
}
