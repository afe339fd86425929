//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → handlers.rs (/healthz, /metrics locally; everything else proxied)
//!     → proxy engine (route, forward, map response)
//!     → middleware.rs (request count and latency)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
