//! Sandbox Gateway Library
//!
//! Path-routed HTTP reverse proxy in front of the sandbox cluster services.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod proxy;
pub mod routing;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatewayConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
