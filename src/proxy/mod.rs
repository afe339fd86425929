//! Proxy engine subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → routing (resolve route; unbound origin → 502, no call)
//!     → request.rs (OutboundRequest: URL, sanitized headers, body)
//!     → upstream client (execute, buffer response)
//!     → engine.rs (classify outcome, record metric, sanitize response)
//!     → inbound Response
//! ```
//!
//! # Design Decisions
//! - Bodies are fully buffered in both directions
//! - 5xx responses are counted as failures but forwarded unchanged
//! - Transport errors are logged, never returned to the caller

pub mod engine;
pub mod request;

pub use engine::ProxyEngine;
pub use request::{InboundRequest, OutboundRequest};
