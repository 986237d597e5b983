//! Gateway REST client.
//!
//! # Responsibilities
//! - Resolve merchant credentials for each request
//! - Send exactly one bearer-authenticated POST per operation
//! - Turn non-2xx JSON answers into `GatewayError::Rejected` with the gateway's message
//! - Treat any body that is not JSON as `GatewayError::Decode`
//!
//! No retries and no timeouts beyond reqwest's defaults.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::checkout::{SaleOrder, SessionOrder};
use crate::config::schema::GatewayConfig;
use crate::gateway::mapping;
use crate::gateway::types::{
    error_message, Endpoint, GatewayError, GatewayResult, Merchant, PaymentSession,
};
use crate::observability::metrics;

/// Client for the payment gateway API.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: Arc<GatewayConfig>,
}

impl GatewayClient {
    /// Create a new client over the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a client reusing an existing reqwest client.
    pub fn with_http_client(config: GatewayConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    /// Resolve credentials. Fails when any credential is missing.
    pub fn merchant(&self) -> GatewayResult<Merchant<'_>> {
        Merchant::from_credentials(&self.config.credentials)
    }

    /// Request a hosted fields token and return the access token.
    pub async fn create_token(&self, merchant: &Merchant<'_>) -> GatewayResult<String> {
        let body = mapping::token_body(&self.config, merchant);
        let value = self.post(Endpoint::Token, merchant, &body).await?;

        match value.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(GatewayError::Incomplete {
                endpoint: Endpoint::Token,
                field: "access_token",
                message: error_message(&value),
            }),
        }
    }

    /// Open a hosted payment page session.
    pub async fn create_session(
        &self,
        merchant: &Merchant<'_>,
        order: SessionOrder,
    ) -> GatewayResult<PaymentSession> {
        let body = mapping::session_body(&self.config, merchant, order);
        tracing::debug!(
            external_id = %body.external_id,
            amount = %body.amount,
            items = body.items.len(),
            "Creating payment session"
        );
        let value = self.post(Endpoint::Session, merchant, &body).await?;

        PaymentSession::from_response(&value).ok_or_else(|| GatewayError::Incomplete {
            endpoint: Endpoint::Session,
            field: "code/url",
            message: error_message(&value),
        })
    }

    /// Run a sale against a hosted fields token. The gateway result is
    /// returned untouched.
    pub async fn sale(&self, merchant: &Merchant<'_>, order: SaleOrder) -> GatewayResult<Value> {
        let body = mapping::sale_body(merchant, order);
        tracing::debug!(
            external_id = %body.external_id,
            amount = %body.amount,
            "Submitting sale"
        );
        self.post(Endpoint::Sale, merchant, &body).await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        merchant: &Merchant<'_>,
        body: &T,
    ) -> GatewayResult<Value> {
        let url = self.config.endpoint(endpoint.path(&self.config));
        tracing::debug!(endpoint = %endpoint, url = %url, "Calling gateway");

        let response = self
            .http
            .post(&url)
            .bearer_auth(merchant.api_token)
            .json(body)
            .send()
            .await
            .map_err(|source| {
                metrics::record_gateway_call(endpoint.as_str(), "transport_error");
                GatewayError::Transport { endpoint, source }
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| {
            metrics::record_gateway_call(endpoint.as_str(), "transport_error");
            GatewayError::Transport { endpoint, source }
        })?;
        let parsed: Option<Value> = serde_json::from_slice(&bytes).ok();

        // An unreadable body is a decode failure whatever the status.
        let Some(value) = parsed else {
            metrics::record_gateway_call(endpoint.as_str(), "decode_error");
            tracing::warn!(endpoint = %endpoint, status = %status, "Gateway body is not JSON");
            return Err(GatewayError::Decode { endpoint });
        };

        if !status.is_success() {
            metrics::record_gateway_call(endpoint.as_str(), "rejected");
            return Err(GatewayError::Rejected {
                endpoint,
                status: status.as_u16(),
                message: error_message(&value),
            });
        }

        metrics::record_gateway_call(endpoint.as_str(), "ok");
        tracing::debug!(endpoint = %endpoint, status = %status, "Gateway call succeeded");
        Ok(value)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.config.base_url)
            .field("credentials", &self.config.credentials)
            .finish()
    }
}
