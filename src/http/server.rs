//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS, body limit, metrics)
//! - Own the upstream client lifecycle around the serve loop
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::middleware::track_http_metrics;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::Metrics;
use crate::proxy::ProxyEngine;
use crate::routing::RouteTable;
use crate::security::cors_layer;
use crate::upstream::{ClientSettings, UpstreamClient};

const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: ProxyEngine,
    pub metrics: Metrics,
}

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to start upstream client: {0}")]
    UpstreamClient(#[from] reqwest::Error),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    upstream: UpstreamClient,
    metrics: Metrics,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The upstream client handle is created here but only started by
    /// [`HttpServer::run`]; health and metrics routes work without it.
    pub fn new(config: GatewayConfig) -> Self {
        let metrics = Metrics::new();
        let routes = Arc::new(RouteTable::from_config(&config.upstreams));
        let upstream = UpstreamClient::new(ClientSettings::from_config(&config));

        let state = AppState {
            engine: ProxyEngine::new(routes, upstream.clone(), metrics.clone()),
            metrics: metrics.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            upstream,
            metrics,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        // Only GET is local; `get` would also answer HEAD, so HEAD is routed to
        // the proxy explicitly along with every other method.
        Router::new()
            .route(
                "/healthz",
                get(handlers::healthz)
                    .head(handlers::proxy)
                    .fallback(handlers::proxy),
            )
            .route(
                "/metrics",
                get(handlers::metrics)
                    .head(handlers::proxy)
                    .fallback(handlers::proxy),
            )
            .route("/", any(handlers::proxy))
            .route("/{*path}", any(handlers::proxy))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(middleware::from_fn_with_state(
                state.metrics.clone(),
                track_http_metrics,
            ))
            .with_state(state)
            .layer(cors_layer(&config.cors))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener until
    /// a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;

        let upkeep = tokio::spawn(self.metrics.clone().run_upkeep(METRICS_UPKEEP_INTERVAL));

        if let Err(e) = self.upstream.start() {
            upkeep.abort();
            return Err(e.into());
        }

        tracing::info!(
            address = %addr,
            legacy = %self.config.upstreams.legacy_base_url,
            locations = %self.config.upstreams.locations_base_url,
            "Gateway ready"
        );

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await;

        self.upstream.shutdown();
        upkeep.abort();

        served?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Router with all routes and layers, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the shared upstream client.
    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// The server's metrics registry.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
