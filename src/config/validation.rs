//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port non-zero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Route entries are not checked: any parsed route table is accepted, and
//!   duplicate method+path pairs are legal since later routes shadow earlier
//!   ones. Odd entries are reported as warnings when the table is compiled

use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::{HttpConfig, LimitConfig, RouterConfig, TimeoutConfig};

/// A single semantic problem in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("port must be non-zero")]
    ZeroPort,

    #[error("process must not be empty")]
    EmptyProcess,

    #[error("bind address {0:?} is not an IP address")]
    InvalidBind(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a router document.
pub fn validate_router_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_timeouts(&config.timeouts, &mut errors);
    check_limits(&config.limits, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an HTTP bridge document.
pub fn validate_http_config(config: &HttpConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.process.is_empty() {
        errors.push(ValidationError::EmptyProcess);
    }
    if config.bind.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidBind(config.bind.clone()));
    }

    check_timeouts(&config.timeouts, &mut errors);
    check_limits(&config.limits, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_timeouts(timeouts: &TimeoutConfig, errors: &mut Vec<ValidationError>) {
    if timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.connect_ms"));
    }
    if timeouts.exchange_ms == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.exchange_ms"));
    }
}

fn check_limits(limits: &LimitConfig, errors: &mut Vec<ValidationError>) {
    if limits.max_request_bytes == 0 {
        errors.push(ValidationError::ZeroValue("limits.max_request_bytes"));
    }
    if limits.max_response_bytes == 0 {
        errors.push(ValidationError::ZeroValue("limits.max_response_bytes"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    #[test]
    fn accepts_any_route_entries() {
        let config = RouterConfig {
            routes: vec![
                RouteConfig::new("GET", "/a", "/tmp/p1.sock"),
                RouteConfig::new("get", "/a", "/tmp/p2.sock"),
                RouteConfig::new("GE T", "", ""),
            ],
            ..RouterConfig::default()
        };
        assert!(validate_router_config(&config).is_ok());
    }

    #[test]
    fn collects_every_limit_error() {
        let mut config = RouterConfig::default();
        config.timeouts.connect_ms = 0;
        config.limits.max_request_bytes = 0;
        config.limits.max_response_bytes = 0;

        let errors = validate_router_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroValue("timeouts.connect_ms"),
                ValidationError::ZeroValue("limits.max_request_bytes"),
                ValidationError::ZeroValue("limits.max_response_bytes"),
            ]
        );
    }

    #[test]
    fn rejects_zero_port_and_bad_bind() {
        let mut config = HttpConfig::new(0, "/tmp/b.sock");
        config.bind = "localhost".into();
        config.timeouts.exchange_ms = 0;

        let errors = validate_http_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::InvalidBind("localhost".into())));
        assert!(errors.contains(&ValidationError::ZeroValue("timeouts.exchange_ms")));
    }
}
