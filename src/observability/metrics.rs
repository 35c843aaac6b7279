//! Metrics collection and exposition.
//!
//! # Metrics
//! - `waypoint_requests_total` (counter): requests by method, status, route
//! - `waypoint_request_duration_seconds` (histogram): time spent in the chain
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and costs nothing until a
//!   recorder is installed
//! - Route label is the registered pattern, never the raw path, to keep
//!   label cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label used when no pattern matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    metrics::counter!("waypoint_requests_total", &labels).increment(1);
    metrics::histogram!("waypoint_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
