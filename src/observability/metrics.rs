//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define bridge metrics (requests, dispatch latency, dispatch errors)
//! - Expose a Prometheus-compatible endpoint when configured
//!
//! # Metrics
//! - `bridge_requests_total` (counter): responses by front-end and status
//! - `bridge_request_duration_seconds` (histogram): front-end latency
//! - `bridge_dispatch_duration_seconds` (histogram): backend round-trip latency
//! - `bridge_dispatch_errors_total` (counter): failed dispatches by kind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels for front-end, backend address, status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

/// Record one response emitted by a front-end.
pub fn record_request(frontend: &'static str, status: i64, start: Instant) {
    ::metrics::counter!(
        "bridge_requests_total",
        "frontend" => frontend,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("bridge_request_duration_seconds", "frontend" => frontend)
        .record(start.elapsed().as_secs_f64());
}

/// Record one backend dispatch.
pub fn record_dispatch(backend: &str, outcome: &'static str, start: Instant) {
    ::metrics::histogram!(
        "bridge_dispatch_duration_seconds",
        "backend" => backend.to_string(),
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());

    if outcome != "ok" {
        ::metrics::counter!(
            "bridge_dispatch_errors_total",
            "backend" => backend.to_string(),
            "kind" => outcome
        )
        .increment(1);
    }
}
