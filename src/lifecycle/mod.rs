//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging → Metrics + router (health, scrape live)
//!     → Upstream client start → Accept traffic
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight → Close upstream client
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The upstream client is released only after in-flight requests drain

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
