//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup, longest prefix first)
//!     → matcher.rs (evaluate prefix / catch-all)
//!     → Return: matched Route (always one)
//!
//! Route Compilation (at startup):
//!     UpstreamsConfig
//!     → label.rs (origin → upstream label)
//!     → Sort prefixes by specificity
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - The catch-all makes lookup total; there is no NoMatch

pub mod label;
pub mod matcher;
pub mod router;

pub use label::{UpstreamLabel, UpstreamLabels};
pub use matcher::PathMatcher;
pub use router::{target_url, Route, RouteTable, LOCATIONS_PREFIX};
