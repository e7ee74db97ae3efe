//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that capture side and relay agree on the endpoint path
//! - Validate value ranges (caps and capacities > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("relay.endpoint: {0:?} must start with '/'")]
    EndpointPath(String),

    #[error("capture.endpoint_url: invalid URL {0:?}")]
    InvalidUrl(String),

    #[error("capture.endpoint_url path {capture:?} does not match relay.endpoint {relay:?}")]
    EndpointMismatch { capture: String, relay: String },
}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_connections",
        });
    }

    if !config.relay.endpoint.starts_with('/') {
        errors.push(ValidationError::EndpointPath(config.relay.endpoint.clone()));
    }
    if config.relay.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "relay.max_body_bytes",
        });
    }

    match Url::parse(&config.capture.endpoint_url) {
        Ok(url) if url.path() != config.relay.endpoint => {
            errors.push(ValidationError::EndpointMismatch {
                capture: url.path().to_string(),
                relay: config.relay.endpoint.clone(),
            });
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidUrl(
            config.capture.endpoint_url.clone(),
        )),
    }
    if config.capture.queue_capacity == 0 {
        errors.push(ValidationError::Zero {
            field: "capture.queue_capacity",
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
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
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.relay.max_body_bytes = 0;
        config.capture.queue_capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero {
            field: "relay.max_body_bytes"
        }));
    }

    #[test]
    fn test_endpoint_must_agree_between_sides() {
        let mut config = RelayConfig::default();
        config.relay.endpoint = "/__console".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EndpointMismatch {
                capture: "/__log".into(),
                relay: "/__console".into(),
            }]
        );
    }

    #[test]
    fn test_endpoint_override_keeps_sides_in_agreement() {
        let mut config = RelayConfig::default();
        config.set_endpoint("/__console");

        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_relative_endpoint_is_rejected() {
        let mut config = RelayConfig::default();
        config.relay.endpoint = "__log".into();
        config.capture.endpoint_url = "http://127.0.0.1:5174__log".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EndpointPath("__log".into())));
    }
}
