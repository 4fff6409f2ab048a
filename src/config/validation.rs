//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, status codes and log levels
//! - Run app info through the same normalisation `SuperTokens::new` uses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: &ServerConfig → Result<(), Vec<String>>

use std::net::SocketAddr;

use super::schema::ServerConfig;
use crate::normalise::NormalisedAppInfo;
use crate::querier::HttpQuerier;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "listener.bind_address '{}' is not a socket address",
            config.listener.bind_address
        ));
    }

    if let Err(e) = NormalisedAppInfo::new(&config.app_info) {
        errors.push(format!("app_info: {}", e));
    }

    if let Some(conn) = &config.supertokens {
        if let Err(e) = HttpQuerier::from_connection_uri(&conn.connection_uri, conn.api_key.clone()) {
            errors.push(format!("supertokens.connection_uri: {}", e));
        }
    }

    let status = config.session.session_expired_status_code;
    if !(400..600).contains(&status) {
        errors.push(format!(
            "session.session_expired_status_code must be 4xx/5xx, got {}",
            status
        ));
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "observability.log_level '{}' is not one of {}",
            config.observability.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(format!(
            "observability.metrics_address '{}' is not a socket address",
            config.observability.metrics_address
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.app_info.website_domain = String::new();
        config.session.session_expired_status_code = 302;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[1].contains("websiteDomain"));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
