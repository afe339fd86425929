//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use sandbox_gateway::config::GatewayConfig;
use sandbox_gateway::{HttpServer, Shutdown};

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Captures = Arc<Mutex<Vec<Captured>>>;

/// Start a mock upstream that records every request and answers with a
/// fixed status and body.
pub async fn start_recording_backend(
    status: StatusCode,
    body: &'static str,
) -> (SocketAddr, Captures) {
    let captures: Captures = Arc::default();
    let recorded = captures.clone();

    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, bytes: Bytes| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(Captured {
                    method,
                    uri,
                    headers,
                    body: bytes,
                });
                (status, [("x-upstream", "mock")], body)
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, captures)
}

/// Start a raw backend that writes `raw_response` verbatim to each connection.
pub async fn start_raw_backend(raw_response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(raw_response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Start a backend that accepts connections and reads the request but never
/// answers within `stall`.
pub async fn start_stalled_backend(stall: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(stall).await;
            });
        }
    });
    addr
}

/// An origin nothing is listening on.
pub fn unreachable_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Config pointing both well-known routes at the given origins.
pub fn config(legacy: &str, locations: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstreams.legacy_base_url = legacy.into();
    config.upstreams.locations_base_url = locations.into();
    config
}

/// A running gateway. Dropping the guard's `Shutdown` stops the server.
pub struct RunningGateway {
    pub addr: SocketAddr,
    pub metrics: sandbox_gateway::observability::Metrics,
    pub shutdown: Shutdown,
}

impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Spawn a gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let metrics = server.metrics().clone();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait until the upstream client is started and the listener answers.
    let client = http_client();
    for _ in 0..50 {
        if client
            .get(format!("http://{addr}/healthz"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    RunningGateway {
        addr,
        metrics,
        shutdown,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Value of `gateway_proxy_requests_total{upstream, outcome}` in a scrape.
pub fn proxy_sample(rendered: &str, upstream: &str, outcome: &str) -> u64 {
    rendered
        .lines()
        .filter(|line| line.starts_with("gateway_proxy_requests_total{"))
        .filter(|line| line.contains(&format!("upstream=\"{upstream}\"")))
        .filter(|line| line.contains(&format!("outcome=\"{outcome}\"")))
        .filter_map(|line| line.rsplit(' ').next()?.parse::<f64>().ok())
        .map(|v| v as u64)
        .sum()
}
