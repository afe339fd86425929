//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, latency summaries)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through logs and to the upstream
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use self::metrics::{Metrics, Outcome};
