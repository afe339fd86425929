//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins and the path prefixes bound to them.
    pub upstreams: UpstreamsConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Timeout configuration for outbound calls.
    pub timeouts: TimeoutConfig,

    /// Pooling and concurrency limits of the shared upstream client.
    pub upstream_client: UpstreamClientConfig,

    /// Inbound request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

pub const DEFAULT_LEGACY_BASE_URL: &str =
    "https://5cjnp8rcga.execute-api.us-west-2.amazonaws.com/staging_api";
pub const DEFAULT_LOCATIONS_BASE_URL: &str = "http://locations.sandbox-app.svc.cluster.local";

/// Upstream origin bindings.
///
/// An empty origin is legal: requests routed to it are answered with
/// `502 Missing upstream configuration` without any outbound call.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Origin for the catch-all route.
    pub legacy_base_url: String,

    /// Origin for everything under `/locations`.
    pub locations_base_url: String,

    /// Additional prefix overrides.
    pub routes: Vec<RouteConfig>,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            legacy_base_url: DEFAULT_LEGACY_BASE_URL.to_string(),
            locations_base_url: DEFAULT_LOCATIONS_BASE_URL.to_string(),
            routes: Vec::new(),
        }
    }
}

/// A named prefix override mapping requests to an upstream origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path prefix to match (literal, case-sensitive).
    pub path_prefix: String,

    /// Upstream origin the prefix is forwarded to.
    #[serde(default)]
    pub base_url: String,
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins permitted to make cross-origin calls. Empty permits all.
    pub allowed_origins: Vec<String>,
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Upstream client pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamClientConfig {
    /// Maximum outbound calls in flight at once, across all upstreams.
    pub max_concurrent_requests: usize,

    /// Maximum idle pooled connections kept per upstream host.
    pub pool_max_idle_per_host: usize,

    /// Idle pooled connections are closed after this many seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 1024,
            pool_max_idle_per_host: 32,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
