//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_proxy_requests_total` (counter): proxied calls by upstream, outcome
//! - `http_requests_total` (counter): inbound requests by method, handler, status class
//! - `http_request_duration_seconds` (summary): inbound latency by method, handler
//!
//! # Design Decisions
//! - Each `Metrics` owns its own Prometheus recorder instead of installing a
//!   global one, so independent servers (and tests) never share counters
//! - Counter increments are atomic and never fail
//! - The registry exists before the upstream client, so scraping works from
//!   the first accepted connection

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const PROXY_REQUESTS_TOTAL: &str = "gateway_proxy_requests_total";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Result of one proxied call, as seen by metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// `Success` for any status below 500.
    pub fn from_status(status: StatusCode) -> Self {
        if status.as_u16() < 500 {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Process metrics registry.
#[derive(Clone)]
pub struct Metrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl Metrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counter!(
                PROXY_REQUESTS_TOTAL,
                "Total number of proxied requests grouped by upstream and outcome"
            );
            describe_counter!(
                HTTP_REQUESTS_TOTAL,
                "Total number of requests by method, status and handler"
            );
            describe_histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Latency of handled requests"
            );
        });

        Self {
            recorder: Arc::new(recorder),
            handle,
        }
    }

    /// Count one proxied call against its upstream label.
    pub fn record_proxy_outcome(&self, upstream: &'static str, outcome: Outcome) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            counter!(PROXY_REQUESTS_TOTAL, "upstream" => upstream, "outcome" => outcome.as_str())
                .increment(1);
        });
    }

    /// Record one handled inbound request.
    pub fn record_request(
        &self,
        method: &str,
        handler: &str,
        status: StatusCode,
        start_time: Instant,
    ) {
        let elapsed = start_time.elapsed().as_secs_f64();
        let method = method.to_string();
        let handler = handler.to_string();
        let status = status_class(status);

        metrics::with_local_recorder(self.recorder.as_ref(), || {
            counter!(
                HTTP_REQUESTS_TOTAL,
                "method" => method.clone(),
                "handler" => handler.clone(),
                "status" => status
            )
            .increment(1);
            histogram!(HTTP_REQUEST_DURATION_SECONDS, "method" => method, "handler" => handler)
                .record(elapsed);
        });
    }

    /// Render every sample in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Periodically drain histogram buckets until the task is aborted.
    pub async fn run_upkeep(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.handle.run_upkeep();
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Status grouped as `2xx`, `4xx`, ...
fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rendered: &str, upstream: &str, outcome: &str) -> u64 {
        rendered
            .lines()
            .filter(|line| line.starts_with(PROXY_REQUESTS_TOTAL))
            .filter(|line| line.contains(&format!("upstream=\"{upstream}\"")))
            .filter(|line| line.contains(&format!("outcome=\"{outcome}\"")))
            .filter_map(|line| line.rsplit(' ').next()?.parse::<f64>().ok())
            .map(|v| v as u64)
            .sum()
    }

    #[test]
    fn outcome_classification() {
        assert_eq!(Outcome::from_status(StatusCode::OK), Outcome::Success);
        assert_eq!(Outcome::from_status(StatusCode::NOT_FOUND), Outcome::Success);
        assert_eq!(Outcome::from_status(StatusCode::from_u16(499).unwrap()), Outcome::Success);
        assert_eq!(Outcome::from_status(StatusCode::INTERNAL_SERVER_ERROR), Outcome::Failure);
        assert_eq!(Outcome::from_status(StatusCode::SERVICE_UNAVAILABLE), Outcome::Failure);
    }

    #[test]
    fn counts_by_upstream_and_outcome() {
        let metrics = Metrics::new();
        metrics.record_proxy_outcome("legacy", Outcome::Failure);
        metrics.record_proxy_outcome("legacy", Outcome::Failure);
        metrics.record_proxy_outcome("locations", Outcome::Success);

        let rendered = metrics.render();
        assert_eq!(sample(&rendered, "legacy", "failure"), 2);
        assert_eq!(sample(&rendered, "locations", "success"), 1);
        assert_eq!(sample(&rendered, "legacy", "success"), 0);
    }

    #[test]
    fn registries_are_independent() {
        let a = Metrics::new();
        let b = Metrics::new();
        a.record_proxy_outcome("custom", Outcome::Success);
        assert_eq!(sample(&a.render(), "custom", "success"), 1);
        assert_eq!(sample(&b.render(), "custom", "success"), 0);
    }

    #[test]
    fn request_metrics_group_status() {
        let metrics = Metrics::new();
        metrics.record_request("GET", "/healthz", StatusCode::OK, Instant::now());
        let rendered = metrics.render();
        assert!(rendered
            .lines()
            .any(|l| l.starts_with(HTTP_REQUESTS_TOTAL) && l.contains("status=\"2xx\"")));
    }
}
