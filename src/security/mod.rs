//! Request/response hygiene at the gateway boundary.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//!     → outbound request
//!
//! Upstream response headers
//!     → headers.rs (strip hop-by-hop)
//!     → inbound response
//!     → cors.rs (cross-origin headers for browser callers)
//! ```

pub mod cors;
pub mod headers;

pub use cors::cors_layer;
pub use headers::{apply_forwarding_headers, sanitize};
