//! Errors absorbed at the proxy boundary.
//!
//! Every variant maps to a fixed, well-formed response. Upstream details
//! (URLs, transport errors) only ever reach the logs, never a response body.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::routing::UpstreamLabel;

pub const MISSING_UPSTREAM_BODY: &str = "Missing upstream configuration";
pub const UPSTREAM_FAILED_BODY: &str = "Upstream request failed";

/// Errors that can occur while proxying a request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The matched route has no upstream origin bound (maps to 502).
    #[error("route `{prefix}` has no upstream origin configured")]
    MissingUpstream { prefix: String },

    /// The shared client is not running (maps to 500).
    #[error("upstream client is not initialized")]
    ClientNotInitialized,

    /// Connect, DNS, reset, timeout or body read failure (maps to 502).
    #[error("{upstream} request to {url} failed: {source}")]
    Transport {
        upstream: UpstreamLabel,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingUpstream { .. } | ProxyError::Transport { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::ClientNotInitialized => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ProxyError::MissingUpstream { .. } => (status, MISSING_UPSTREAM_BODY).into_response(),
            ProxyError::Transport { .. } => (
                status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                )],
                UPSTREAM_FAILED_BODY,
            )
                .into_response(),
            ProxyError::ClientNotInitialized => (status, "Internal Server Error").into_response(),
        }
    }
}

/// Result type alias for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_upstream_is_bad_gateway() {
        let response = ProxyError::MissingUpstream {
            prefix: "/locations".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn uninitialized_client_is_internal_error() {
        let response = ProxyError::ClientNotInitialized.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
