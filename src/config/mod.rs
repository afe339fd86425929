//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → consumed once at startup by every subsystem
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, GatewayConfig, ListenerConfig, RouteConfig, TimeoutConfig, UpstreamClientConfig,
    UpstreamsConfig,
};
