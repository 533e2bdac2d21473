//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_updates_total` (counter): successful updates by section
//! - `config_reloads_total` (counter): reloads by outcome
//! - `config_errors_total` (counter): failed API requests by kind
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Serve Prometheus metrics on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_update(section: &str) {
    ::metrics::counter!("config_updates_total", "section" => section.to_string()).increment(1);
}

pub fn record_reload(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("config_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_error(kind: &'static str) {
    ::metrics::counter!("config_errors_total", "kind" => kind).increment(1);
}
