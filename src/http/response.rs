//! Error responses.
//!
//! Every failure leaves the proxy as `{"error": "<message>"}`:
//! - client input problems → 400
//! - bodies over the configured limit → 413
//! - missing server configuration → 500
//! - gateway rejections → the gateway's own status and message
//! - gateway answers lacking the expected field → 502
//! - transport or decoding failures → generic 500

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::gateway::GatewayError;

pub const CONFIGURATION_ERROR: &str = "Payment service configuration error";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const INVALID_BODY: &str = "Invalid request body";
pub const BODY_TOO_LARGE: &str = "Request body too large";

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(rejection) if is_too_large(rejection) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::InvalidBody(_) | ApiError::Checkout(_) => StatusCode::BAD_REQUEST,
            ApiError::Gateway(err) => match err {
                GatewayError::NotConfigured { .. }
                | GatewayError::Transport { .. }
                | GatewayError::Decode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                GatewayError::Rejected { status, .. } => StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                GatewayError::Incomplete { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Message safe to show the storefront.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::InvalidBody(rejection) if is_too_large(rejection) => {
                BODY_TOO_LARGE.to_string()
            }
            ApiError::InvalidBody(_) => INVALID_BODY.to_string(),
            ApiError::Checkout(err) => err.to_string(),
            ApiError::Gateway(err) => match err {
                GatewayError::NotConfigured { .. } => CONFIGURATION_ERROR.to_string(),
                GatewayError::Transport { .. } | GatewayError::Decode { .. } => {
                    INTERNAL_ERROR.to_string()
                }
                GatewayError::Rejected {
                    endpoint, message, ..
                }
                | GatewayError::Incomplete {
                    endpoint, message, ..
                } => message
                    .clone()
                    .unwrap_or_else(|| endpoint.failure_message().to_string()),
            },
        }
    }
}

fn is_too_large(rejection: &JsonRejection) -> bool {
    rejection.status() == StatusCode::PAYLOAD_TOO_LARGE
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
