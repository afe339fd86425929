//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` takes precedence; otherwise the configured level applies to
//!   the gateway and its HTTP middleware

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives for a plain level such as `info` or `DEBUG`.
pub fn default_directives(level: &str) -> String {
    let level = level.trim().to_lowercase();
    format!("sandbox_gateway={level},tower_http={level}")
}

/// Install the global tracing subscriber.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
