//! Prometheus metrics for the gateway.
//!
//! Tracks the latency of outbound calls to the ML service and counters for
//! the traffic the gateway serves. The recorder is installed once at startup
//! and rendered by the `/metrics` endpoint.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::debug;

// === Metric Name Constants ===

/// Upstream request latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_request_latency_ms";
/// Predictions served counter metric name.
pub const METRIC_PREDICTIONS_SERVED: &str = "predictions_served_total";
/// Prediction failures counter metric name.
pub const METRIC_PREDICTION_FAILURES: &str = "prediction_failures_total";
/// Client payloads received counter metric name.
pub const METRIC_PAYLOADS_RECEIVED: &str = "payloads_received_total";

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; repeated calls are tolerated.
pub fn init_metrics() {
    if PROMETHEUS_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = PROMETHEUS_HANDLE.set(handle);
            }
            Err(e) => {
                debug!(error = %e, "Prometheus recorder already installed");
            }
        }
    }

    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Outbound ML service request latency in milliseconds"
    );
    describe_counter!(
        METRIC_PREDICTIONS_SERVED,
        "Total number of predictions proxied successfully"
    );
    describe_counter!(
        METRIC_PREDICTION_FAILURES,
        "Total number of prediction requests that failed upstream"
    );
    describe_counter!(
        METRIC_PAYLOADS_RECEIVED,
        "Total number of client payloads accepted by the echo endpoint"
    );

    debug!("Metrics initialized");
}

/// Render the current metrics in Prometheus text exposition format.
///
/// Returns an empty string when the recorder was never installed.
pub fn render() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Record latency of an outbound call to the ML service.
pub fn record_upstream_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment the predictions served counter.
pub fn inc_predictions_served() {
    counter!(METRIC_PREDICTIONS_SERVED).increment(1);
}

/// Increment the prediction failures counter.
pub fn inc_prediction_failures() {
    counter!(METRIC_PREDICTION_FAILURES).increment(1);
}

/// Increment the payloads received counter.
pub fn inc_payloads_received() {
    counter!(METRIC_PAYLOADS_RECEIVED).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_empty_before_install() {
        // The recorder may have been installed by another test in this
        // process; either way render must not panic.
        let _ = render();
    }

    #[test]
    fn init_metrics_is_idempotent() {
        init_metrics();
        init_metrics();
        assert!(PROMETHEUS_HANDLE.get().is_some());
    }
}
