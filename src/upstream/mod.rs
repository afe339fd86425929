//! Upstream client subsystem.
//!
//! # Lifecycle
//! ```text
//! UpstreamClient::new   (startup, before listeners; not yet usable)
//!     → start()         (pool built, requests may flow)
//!     → send() ...      (shared by all in-flight requests)
//!     → shutdown()      (after the server drains; pool released)
//! ```

pub mod client;

pub use client::{ClientSettings, UpstreamClient, UpstreamResponse};
