//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics (parseable addresses
//! and URLs, sane limits). All errors are collected, not just the first.
//! Credentials are deliberately not checked here: a missing credential is
//! reported per request as a server configuration error.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid {field} URL '{value}'")]
    Url { field: &'static str, value: String },

    #[error("gateway path '{0}' must start with '/'")]
    Path(String),

    #[error("at least one CORS origin is required")]
    NoOrigins,

    #[error("invalid CORS origin '{0}'")]
    Origin(String),

    #[error("max_body_size must be greater than zero")]
    BodyLimit,

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    check_url(&mut errors, "gateway base", &config.gateway.base_url);
    check_url(&mut errors, "client", &config.gateway.client_url);

    for path in [
        &config.gateway.token_path,
        &config.gateway.session_path,
        &config.gateway.sale_path,
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::Path(path.clone()));
        }
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::NoOrigins);
    }
    for origin in &config.cors.allowed_origins {
        if origin.parse::<axum::http::HeaderValue>().is_err() || url::Url::parse(origin).is_err() {
            errors.push(ValidationError::Origin(origin.clone()));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        _ => errors.push(ValidationError::Url {
            field,
            value: value.to_string(),
        }),
    }
}
