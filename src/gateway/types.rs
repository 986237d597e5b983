//! Gateway wire types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, GatewayCredentials};

/// Remote endpoints the proxy talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Hosted fields token issuance.
    Token,
    /// Hosted payment page session.
    Session,
    /// Direct sale against a hosted fields token.
    Sale,
}

impl Endpoint {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Token => "token",
            Endpoint::Session => "session",
            Endpoint::Sale => "sale",
        }
    }

    /// Configured path for this endpoint.
    pub fn path(self, config: &GatewayConfig) -> &str {
        match self {
            Endpoint::Token => &config.token_path,
            Endpoint::Session => &config.session_path,
            Endpoint::Sale => &config.sale_path,
        }
    }

    /// Message relayed to the client when the gateway gives none.
    pub fn failure_message(self) -> &'static str {
        match self {
            Endpoint::Token => "Failed to create token",
            Endpoint::Session => "Failed to create payment session",
            Endpoint::Sale => "Payment failed",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while talking to the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// One or more credentials are missing or malformed.
    #[error("gateway credentials not configured: {}", .missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },

    /// The request never produced a response.
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// The gateway answered 2xx with a body that is not JSON.
    #[error("{endpoint} response is not valid JSON")]
    Decode { endpoint: Endpoint },

    /// The gateway answered with a non-2xx status.
    #[error("{endpoint} rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        endpoint: Endpoint,
        status: u16,
        message: Option<String>,
    },

    /// The gateway answered 2xx but without the field we need.
    #[error("{endpoint} response missing '{field}'")]
    Incomplete {
        endpoint: Endpoint,
        field: &'static str,
        message: Option<String>,
    },
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Credentials resolved for a single request.
#[derive(Clone, Copy)]
pub struct Merchant<'a> {
    pub api_token: &'a str,
    pub dba_id: &'a str,
    pub terminal: u64,
}

impl<'a> Merchant<'a> {
    /// Resolve credentials, reporting every missing or malformed one.
    pub fn from_credentials(creds: &'a GatewayCredentials) -> GatewayResult<Self> {
        let mut missing = Vec::new();

        let api_token = creds.api_token.as_deref();
        if api_token.is_none() {
            missing.push("api_token");
        }
        let dba_id = creds.dba_id.as_deref();
        if dba_id.is_none() {
            missing.push("dba_id");
        }
        let terminal = match creds.terminal_id.as_deref() {
            Some(raw) => {
                let parsed = raw.parse::<u64>().ok();
                if parsed.is_none() {
                    missing.push("terminal_id (not numeric)");
                }
                parsed
            }
            None => {
                missing.push("terminal_id");
                None
            }
        };

        match (api_token, dba_id, terminal) {
            (Some(api_token), Some(dba_id), Some(terminal)) => Ok(Self {
                api_token,
                dba_id,
                terminal,
            }),
            _ => Err(GatewayError::NotConfigured { missing }),
        }
    }
}

impl std::fmt::Debug for Merchant<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Merchant")
            .field("dba_id", &self.dba_id)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// Body of the hosted fields token call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedFieldsTokenBody<'a> {
    pub terminal: u64,
    pub domain: &'a str,
    /// Minutes until the token expires.
    pub expiration: u32,
    /// One of `required`, `optional`, `disabled`.
    pub save_card: &'static str,
    #[serde(rename = "3ds")]
    pub three_ds: bool,
}

/// Body of the hosted payment session call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionBody {
    pub dba: String,
    pub terminal: u64,
    pub amount: String,
    pub external_id: String,
    pub items: Vec<LineItem>,
    pub customer: Customer,
    pub billing_address: Address,
    pub return_url: String,
    pub cancel_url: String,
}

/// Body of the direct sale call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleBody {
    pub dba: String,
    pub terminal: u64,
    pub amount: String,
    pub external_id: String,
    pub token: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Hosted payment page handle returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub code: String,
    pub url: String,
}

impl PaymentSession {
    /// Pull `code` and `url` out of a gateway response, top level or under `data`.
    pub fn from_response(value: &Value) -> Option<Self> {
        let lookup = |key: &str| {
            value
                .get(key)
                .or_else(|| value.get("data").and_then(|d| d.get(key)))
                .and_then(scalar_to_string)
        };
        Some(Self {
            code: lookup("code")?,
            url: lookup("url")?,
        })
    }
}

/// Human-readable error from a gateway body (`message`, else `error`).
pub fn error_message(value: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merchant_requires_all_credentials() {
        let creds = GatewayCredentials::new(Some("tok".into()), None, Some("abc".into()));
        match Merchant::from_credentials(&creds) {
            Err(GatewayError::NotConfigured { missing }) => {
                assert_eq!(missing, vec!["dba_id", "terminal_id (not numeric)"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_merchant_resolves() {
        let creds =
            GatewayCredentials::new(Some("tok".into()), Some("dba-1".into()), Some("1234".into()));
        let merchant = Merchant::from_credentials(&creds).unwrap();
        assert_eq!(merchant.terminal, 1234);
        assert!(!format!("{:?}", merchant).contains("tok"));
    }

    #[test]
    fn test_token_body_field_names() {
        let body = HostedFieldsTokenBody {
            terminal: 9,
            domain: "https://shop.example",
            expiration: 15,
            save_card: "disabled",
            three_ds: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "terminal": 9,
                "domain": "https://shop.example",
                "expiration": 15,
                "saveCard": "disabled",
                "3ds": false
            })
        );
    }

    #[test]
    fn test_session_from_nested_data() {
        let value = json!({"data": {"code": 8812, "url": "https://pay.example/s/8812"}});
        let session = PaymentSession::from_response(&value).unwrap();
        assert_eq!(session.code, "8812");
        assert_eq!(session.url, "https://pay.example/s/8812");
    }

    #[test]
    fn test_session_missing_url() {
        assert!(PaymentSession::from_response(&json!({"code": "abc"})).is_none());
    }

    #[test]
    fn test_error_message_prefers_message() {
        assert_eq!(
            error_message(&json!({"message": "Unauthorized", "error": "x"})).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(error_message(&json!({"error": "bad"})).as_deref(), Some("bad"));
        assert_eq!(error_message(&json!({"status": 1})), None);
    }

    #[test]
    fn test_rejected_display() {
        let err = GatewayError::Rejected {
            endpoint: Endpoint::Token,
            status: 401,
            message: None,
        };
        assert_eq!(err.to_string(), "token rejected with status 401: no message");
    }
}
