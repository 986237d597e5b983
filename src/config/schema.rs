//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the checkout proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the checkout proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Payment gateway endpoint and credentials.
    pub gateway: GatewayConfig,

    /// Cross-origin policy for the storefront client.
    pub cors: CorsConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway REST base URL, without trailing slash.
    pub base_url: String,

    /// Path of the hosted fields token endpoint.
    pub token_path: String,

    /// Path of the hosted payment session endpoint.
    pub session_path: String,

    /// Path of the direct sale endpoint.
    pub sale_path: String,

    /// Storefront base URL. Used as the hosted fields domain and for redirects.
    pub client_url: String,

    /// Hosted fields token lifetime in minutes.
    pub token_expiration_minutes: u32,

    /// Server-held credentials. Absent values surface as per-request 500s.
    pub credentials: GatewayCredentials,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nrspaydashboard.com".to_string(),
            token_path: "/api/hosted-fields/token".to_string(),
            session_path: "/api/hosted-payments/session".to_string(),
            sale_path: "/api/transactions/sale".to_string(),
            client_url: "http://localhost:5173".to_string(),
            token_expiration_minutes: 15,
            credentials: GatewayCredentials::default(),
        }
    }
}

impl GatewayConfig {
    /// Full URL for a gateway path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Storefront URL for a client-side path.
    pub fn client_link(&self, path: &str) -> String {
        format!("{}{}", self.client_url.trim_end_matches('/'), path)
    }
}

/// Merchant credentials issued by the gateway.
///
/// Never logged; `Debug` only reports presence.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayCredentials {
    /// Bearer token for the gateway API.
    pub api_token: Option<String>,

    /// Merchant (DBA) identifier.
    pub dba_id: Option<String>,

    /// Terminal identifier.
    pub terminal_id: Option<String>,
}

impl GatewayCredentials {
    /// Build credentials from raw values, trimming and dropping blanks.
    pub fn new(
        api_token: Option<String>,
        dba_id: Option<String>,
        terminal_id: Option<String>,
    ) -> Self {
        Self {
            api_token: normalize(api_token),
            dba_id: normalize(dba_id),
            terminal_id: normalize(terminal_id),
        }
    }

    /// Apply trimming rules to values that came from a config file.
    pub fn normalized(self) -> Self {
        Self::new(self.api_token, self.dba_id, self.terminal_id)
    }

    pub fn has_api_token(&self) -> bool {
        self.api_token.is_some()
    }

    pub fn has_dba_id(&self) -> bool {
        self.dba_id.is_some()
    }

    pub fn has_terminal_id(&self) -> bool {
        self.terminal_id.is_some()
    }
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("has_api_token", &self.has_api_token())
            .field("has_dba_id", &self.has_dba_id())
            .field("has_terminal_id", &self.has_terminal_id())
            .finish()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API.
    pub allowed_origins: Vec<String>,

    /// Whether browsers may send credentials.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["https://www.trippyhippie.store".to_string()],
            allow_credentials: true,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "nrs_checkout_proxy=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
