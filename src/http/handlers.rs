//! Checkout API handlers.
//!
//! Each handler resolves credentials first, then parses and validates the
//! body, and only then makes its single gateway call.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkout::{
    validate_sale_request, validate_session_request, validate_token_request,
    PaymentSessionRequest, SaleRequest, TokenRequest,
};
use crate::gateway::PaymentSession;
use crate::http::request::RequestId;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `{token}` returned by `create-token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `GET /`
pub async fn health() -> &'static str {
    "NRS checkout proxy is running"
}

/// `POST /api/nrs/create-token`
pub async fn create_token(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let merchant = state.gateway.merchant()?;
    let Json(request) = payload?;
    let order = validate_token_request(request)?;

    tracing::info!(
        request_id = %request_id,
        amount = order.amount.value(),
        external_id = order.external_id.as_deref().unwrap_or("-"),
        "Creating hosted fields token"
    );

    let token = state.gateway.create_token(&merchant).await?;
    Ok(Json(TokenResponse { token }))
}

/// `POST /api/nrs/pay`
pub async fn pay(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let merchant = state.gateway.merchant()?;
    let Json(request) = payload?;
    let order = validate_sale_request(request)?;

    tracing::info!(
        request_id = %request_id,
        amount = order.amount.value(),
        items = order.cart.len(),
        "Processing sale"
    );

    let result = state.gateway.sale(&merchant, order).await?;
    Ok(Json(result))
}

/// `POST /api/nrs/create-payment`
pub async fn create_payment(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<PaymentSessionRequest>, JsonRejection>,
) -> Result<Json<PaymentSession>, ApiError> {
    let merchant = state.gateway.merchant()?;
    let Json(request) = payload?;
    let order = validate_session_request(request)?;

    tracing::info!(
        request_id = %request_id,
        total = order.total.value(),
        items = order.cart.len(),
        "Creating hosted payment session"
    );

    let session = state.gateway.create_session(&merchant, order).await?;
    tracing::info!(request_id = %request_id, code = %session.code, "Payment session created");
    Ok(Json(session))
}
