//! Inbound and outbound request shapes.
//!
//! # Responsibilities
//! - Capture the parts of an inbound request the proxy needs
//! - Derive the outbound request: target URL, sanitized headers,
//!   forwarding headers, body only for methods that carry one

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, Uri};

use crate::http::X_REQUEST_ID;
use crate::routing::{Route, UpstreamLabel};
use crate::security::headers::{apply_forwarding_headers, sanitize};

/// An inbound request, fully buffered. Owned by the engine for one call.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub scheme: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            scheme: uri.scheme_str().unwrap_or("http").to_string(),
            headers,
            body,
        }
    }

    pub fn request_id(&self) -> &str {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Whether a request with this method forwards its body.
pub fn carries_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

/// The request sent to an upstream origin.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Label of the upstream, for logs and error attribution.
    pub label: UpstreamLabel,
}

impl OutboundRequest {
    /// Build the outbound request for `inbound` on a bound `route`.
    pub fn build(inbound: InboundRequest, route: &Route) -> Self {
        let url = route.target_url(&inbound.path, inbound.query.as_deref());

        let mut headers = sanitize(&inbound.headers);
        apply_forwarding_headers(&mut headers, inbound.headers.get(header::HOST), &inbound.scheme);

        let body = carries_body(&inbound.method).then_some(inbound.body);

        Self {
            method: inbound.method,
            url,
            headers,
            body,
            label: route.label,
        }
    }
}
