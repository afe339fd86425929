//! Header manipulation.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers, in both directions
//! - Add X-Forwarded-Host and X-Forwarded-Proto to outbound requests
//!
//! # Design Decisions
//! - `sanitize` is pure: it returns a new map and never touches its input
//! - Duplicate headers and their relative order are preserved
//! - `host` and `content-length` are dropped too; the outbound client and
//!   the inbound server recompute them for the buffered body

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};

pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Headers never copied between the inbound and outbound sides.
pub static HOP_BY_HOP_HEADERS: [HeaderName; 10] = [
    CONNECTION,
    HeaderName::from_static("keep-alive"),
    PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION,
    TE,
    TRAILER,
    TRANSFER_ENCODING,
    UPGRADE,
    HOST,
    CONTENT_LENGTH,
];

/// Header names are stored lowercase, so this comparison is case-insensitive.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name)
}

/// Copy `headers` without the hop-by-hop set.
pub fn sanitize(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        sanitized.append(name.clone(), value.clone());
    }
    sanitized
}

/// Add the forwarding headers to an outbound header set.
///
/// `x-forwarded-host` is kept if the caller already sent one, otherwise it is
/// set from the inbound `Host` (empty when there was none). `x-forwarded-proto`
/// always reflects the inbound scheme.
pub fn apply_forwarding_headers(headers: &mut HeaderMap, host: Option<&HeaderValue>, scheme: &str) {
    if !headers.contains_key(&X_FORWARDED_HOST) {
        let host = host.cloned().unwrap_or_else(|| HeaderValue::from_static(""));
        headers.insert(X_FORWARDED_HOST, host);
    }
    match HeaderValue::from_str(scheme) {
        Ok(proto) => {
            headers.insert(X_FORWARDED_PROTO, proto);
        }
        Err(_) => {
            tracing::warn!(scheme = %scheme, "Scheme is not a valid header value");
        }
    }
}
