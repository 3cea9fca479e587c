//! Metrics collection and exposition.
//!
//! # Metrics
//! - `binder_requests_total` (counter): requests by method, status, route
//! - `binder_request_duration_seconds` (histogram): latency distribution
//! - `binder_binding_failures_total` (counter): handler errors by kind
//!
//! # Design Decisions
//! - Low-overhead metric updates through the `metrics` facade
//! - The Prometheus exporter is opt-in and serves its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label for requests no route accepted.
pub const NO_ROUTE: &str = "none";

/// Install the Prometheus recorder with an HTTP listener on `addr`.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "binder_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "binder_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_binding_failure(kind: &'static str) {
    metrics::counter!("binder_binding_failures_total", "kind" => kind).increment(1);
}
