//! Shared upstream HTTP client with an explicit lifecycle.
//!
//! # Responsibilities
//! - Own the single pooled `reqwest::Client` used for every outbound call
//! - Enforce connect and total timeouts
//! - Bound concurrent outbound calls to avoid descriptor exhaustion
//! - Buffer upstream response bodies in full
//!
//! # Design Decisions
//! - The handle exists before the client: `start` installs it, `shutdown`
//!   removes it, and calls outside that window fail as an internal fault
//! - Redirects are passed back to the caller, never followed
//! - No automatic retry (prevents duplicate side effects)

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use reqwest::{redirect, Client};
use tokio::sync::Semaphore;

use crate::config::GatewayConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::proxy::request::OutboundRequest;

/// Settings the client is built from.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Connection timeout (TCP + TLS handshake).
    pub connect_timeout: Duration,
    /// Request timeout (includes connection + response body).
    pub request_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
    /// Maximum outbound calls in flight.
    pub max_concurrent_requests: usize,
}

impl ClientSettings {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            connect_timeout: config.timeouts.connect(),
            request_timeout: config.timeouts.request(),
            pool_max_idle_per_host: config.upstream_client.pool_max_idle_per_host,
            pool_idle_timeout: Duration::from_secs(config.upstream_client.pool_idle_timeout_secs),
            max_concurrent_requests: config.upstream_client.max_concurrent_requests,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Lifecycle-managed handle to the shared client. Cheap to clone.
#[derive(Clone)]
pub struct UpstreamClient {
    inner: Arc<Inner>,
}

struct Inner {
    settings: ClientSettings,
    client: ArcSwapOption<Client>,
    permits: Semaphore,
}

impl UpstreamClient {
    /// Create an uninitialized handle.
    pub fn new(settings: ClientSettings) -> Self {
        let permits = Semaphore::new(settings.max_concurrent_requests.min(Semaphore::MAX_PERMITS));
        Self {
            inner: Arc::new(Inner {
                settings,
                client: ArcSwapOption::empty(),
                permits,
            }),
        }
    }

    /// Build the pooled client and make it available to requests.
    pub fn start(&self) -> Result<(), reqwest::Error> {
        let settings = &self.inner.settings;
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .pool_idle_timeout(settings.pool_idle_timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        self.inner.client.store(Some(Arc::new(client)));

        tracing::info!(
            connect_timeout = ?settings.connect_timeout,
            request_timeout = ?settings.request_timeout,
            max_concurrent_requests = settings.max_concurrent_requests,
            "Upstream client started"
        );
        Ok(())
    }

    /// Detach the client. Pooled connections close once in-flight calls
    /// release their reference.
    pub fn shutdown(&self) {
        if self.inner.client.swap(None).is_some() {
            tracing::info!("Upstream client closed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.client.load().is_some()
    }

    /// Execute an outbound request and buffer the full response.
    pub async fn send(&self, request: OutboundRequest) -> ProxyResult<UpstreamResponse> {
        let client = self
            .inner
            .client
            .load_full()
            .ok_or(ProxyError::ClientNotInitialized)?;

        let _permit = self
            .inner
            .permits
            .acquire()
            .await
            .map_err(|_| ProxyError::ClientNotInitialized)?;

        let OutboundRequest {
            method,
            url,
            headers,
            body,
            label,
        } = request;

        let mut builder = client.request(method, url.as_str()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let transport = |source| ProxyError::Transport {
            upstream: label,
            url: url.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
