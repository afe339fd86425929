//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Validation is a pure
//! function over `GatewayConfig` and reports every problem it finds, not just
//! the first one. Empty upstream origins are accepted here: they are a
//! request-time configuration fault, not a startup error.

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use tokio::sync::Semaphore;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("{field} `{value}` is not a valid upstream origin: {reason}")]
    InvalidUpstreamUrl {
        field: String,
        value: String,
        reason: String,
    },

    #[error("route prefix `{0}` must start with `/`")]
    InvalidRoutePrefix(String),

    #[error("route prefix `{0}` is declared more than once")]
    DuplicateRoutePrefix(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.connect_secs ({connect}) exceeds timeouts.request_secs ({request})")]
    ConnectExceedsRequest { connect: u64, request: u64 },

    #[error("upstream_client.max_concurrent_requests must be greater than zero")]
    ZeroConcurrency,

    #[error("upstream_client.max_concurrent_requests ({value}) exceeds the maximum of {max}")]
    ConcurrencyTooLarge { value: usize, max: usize },

    #[error("cors.allowed_origins entry `{0}` is not a valid header value")]
    InvalidAllowedOrigin(String),
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_origin(
        "upstreams.legacy_base_url",
        &config.upstreams.legacy_base_url,
        &mut errors,
    );
    check_origin(
        "upstreams.locations_base_url",
        &config.upstreams.locations_base_url,
        &mut errors,
    );

    let mut seen = HashSet::new();
    for (i, route) in config.upstreams.routes.iter().enumerate() {
        if !route.path_prefix.starts_with('/') {
            errors.push(ValidationError::InvalidRoutePrefix(route.path_prefix.clone()));
        }
        if !seen.insert(route.path_prefix.as_str()) {
            errors.push(ValidationError::DuplicateRoutePrefix(route.path_prefix.clone()));
        }
        check_origin(
            &format!("upstreams.routes[{i}].base_url"),
            &route.base_url,
            &mut errors,
        );
    }

    let timeouts = &config.timeouts;
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if timeouts.connect_secs > timeouts.request_secs {
        errors.push(ValidationError::ConnectExceedsRequest {
            connect: timeouts.connect_secs,
            request: timeouts.request_secs,
        });
    }

    let max_concurrent = config.upstream_client.max_concurrent_requests;
    if max_concurrent == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    } else if max_concurrent > Semaphore::MAX_PERMITS {
        errors.push(ValidationError::ConcurrencyTooLarge {
            value: max_concurrent,
            max: Semaphore::MAX_PERMITS,
        });
    }

    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidAllowedOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        return;
    }
    let reason = match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => return,
        Ok(url) => format!("unsupported scheme `{}`", url.scheme()),
        Err(e) => e.to_string(),
    };
    errors.push(ValidationError::InvalidUpstreamUrl {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    });
}
