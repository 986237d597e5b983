//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment. The result is validated before being returned.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let base = match path {
        Some(p) => read_config_file(p)?,
        None => AppConfig::default(),
    };

    let config = apply_env(base, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a configuration.
///
/// `lookup` abstracts the environment so tests can supply their own.
pub fn apply_env<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let first = |keys: &[&str]| keys.iter().find_map(|&k| lookup(k));

    let creds = &mut config.gateway.credentials;
    if let Some(v) = first(&["NRSPAY_API_TOKEN"]) {
        creds.api_token = Some(v);
    }
    if let Some(v) = first(&["VITE_NRSPAY_DBA_ID", "NRSPAY_DBA_ID"]) {
        creds.dba_id = Some(v);
    }
    if let Some(v) = first(&["VITE_NRSPAY_TERMINAL_ID", "NRSPAY_TERMINAL_ID"]) {
        creds.terminal_id = Some(v);
    }
    config.gateway.credentials = std::mem::take(&mut config.gateway.credentials).normalized();

    if let Some(v) = first(&["NRSPAY_BASE_URL"]) {
        config.gateway.base_url = v.trim().to_string();
    }
    if let Some(v) = first(&["VITE_CLIENT_URL", "CLIENT_URL"]).filter(|v| !v.trim().is_empty()) {
        config.gateway.client_url = v.trim().to_string();
    }

    if let Some(v) = first(&["ALLOWED_ORIGINS", "ALLOWED_ORIGIN"]) {
        let origins: Vec<String> = v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !origins.is_empty() {
            config.cors.allowed_origins = origins;
        }
    }

    if let Some(v) = first(&["PORT"]) {
        let port: u16 = v.trim().parse().map_err(|_| ConfigError::Env {
            key: "PORT",
            value: v.clone(),
        })?;
        config.listener.set_port(port);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overlay_sets_credentials_and_port() {
        let config = apply_env(
            AppConfig::default(),
            env(&[
                ("NRSPAY_API_TOKEN", " abc "),
                ("VITE_NRSPAY_DBA_ID", "42"),
                ("NRSPAY_TERMINAL_ID", "7"),
                ("PORT", "8080"),
            ]),
        )
        .unwrap();

        let creds = &config.gateway.credentials;
        assert_eq!(creds.api_token.as_deref(), Some("abc"));
        assert_eq!(creds.dba_id.as_deref(), Some("42"));
        assert_eq!(creds.terminal_id.as_deref(), Some("7"));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_vite_prefixed_names_win() {
        let config = apply_env(
            AppConfig::default(),
            env(&[("VITE_NRSPAY_DBA_ID", "vite"), ("NRSPAY_DBA_ID", "plain")]),
        )
        .unwrap();
        assert_eq!(config.gateway.credentials.dba_id.as_deref(), Some("vite"));
    }

    #[test]
    fn test_allowed_origins_are_split() {
        let config = apply_env(
            AppConfig::default(),
            env(&[("ALLOWED_ORIGINS", "https://a.example, https://b.example,")]),
        )
        .unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_singular_origin_alias() {
        let config = apply_env(
            AppConfig::default(),
            env(&[("ALLOWED_ORIGIN", "https://solo.example")]),
        )
        .unwrap();
        assert_eq!(config.cors.allowed_origins, vec!["https://solo.example".to_string()]);

        let config = apply_env(
            AppConfig::default(),
            env(&[
                ("ALLOWED_ORIGINS", "https://plural.example"),
                ("ALLOWED_ORIGIN", "https://solo.example"),
            ]),
        )
        .unwrap();
        assert_eq!(config.cors.allowed_origins, vec!["https://plural.example".to_string()]);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let err = apply_env(AppConfig::default(), env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "PORT", .. }));
    }

    #[test]
    fn test_blank_client_url_keeps_default() {
        let config = apply_env(AppConfig::default(), env(&[("VITE_CLIENT_URL", "  ")])).unwrap();
        assert_eq!(config.gateway.client_url, "http://localhost:5173");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_config_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = ConfigError::Validation(vec![ValidationError::NoOrigins, ValidationError::BodyLimit]);
        assert_eq!(
            err.to_string(),
            "Validation failed: at least one CORS origin is required, max_body_size must be greater than zero"
        );
    }
}
