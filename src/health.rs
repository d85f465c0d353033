//! Health report assembly.
//!
//! Two report shapes: a basic liveness report that never touches the
//! network, and a detailed report that embeds the basic fields plus a
//! probe result for each upstream dependency.

use std::time::Instant;

use serde::Serialize;

use crate::config::{SERVICE_NAME, SERVICE_VERSION};
use crate::upstream::{DependencyHealth, DependencyStatus};

/// Liveness report for the gateway process itself.
#[derive(Debug, Clone, Serialize)]
pub struct BasicHealth {
    /// Always "healthy".
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Fractional seconds since process start.
    pub uptime_seconds: f64,
    /// Report time, RFC 3339.
    pub timestamp: String,
}

impl BasicHealth {
    /// Snapshot the process state. Always reports healthy: reaching
    /// this code means the process is serving requests.
    pub fn collect(started_at: Instant) -> Self {
        Self {
            status: "healthy",
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            uptime_seconds: started_at.elapsed().as_secs_f64(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Probe outcome for a single named dependency.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    /// Probe verdict.
    pub status: DependencyStatus,
    /// Base URL that was probed.
    pub url: String,
    /// Upstream body on success, `{"error": msg}` otherwise.
    pub details: serde_json::Value,
}

/// All upstream dependencies of the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct Dependencies {
    /// ML prediction service.
    pub ml_service: DependencyReport,
}

/// Full health report: process liveness plus dependency probes.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealth {
    /// Process liveness fields, flattened to the top level.
    #[serde(flatten)]
    pub basic: BasicHealth,
    /// Per-dependency probe results.
    pub dependencies: Dependencies,
}

impl DetailedHealth {
    pub fn collect(started_at: Instant, ml_url: &str, probe: DependencyHealth) -> Self {
        Self {
            basic: BasicHealth::collect(started_at),
            dependencies: Dependencies {
                ml_service: DependencyReport {
                    status: probe.status,
                    url: ml_url.to_string(),
                    details: probe.details,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_report_has_expected_shape() {
        let report = BasicHealth::collect(Instant::now());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], "pickup-backend");
        assert_eq!(value["version"], SERVICE_VERSION);
        assert!(value["uptime_seconds"].is_f64());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn uptime_does_not_decrease() {
        let started_at = Instant::now();
        let first = BasicHealth::collect(started_at);
        let second = BasicHealth::collect(started_at);

        assert!(second.uptime_seconds >= first.uptime_seconds);
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let report = BasicHealth::collect(Instant::now());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn detailed_report_flattens_basic_fields() {
        let probe = DependencyHealth::available(json!({ "status": "healthy" }));
        let report = DetailedHealth::collect(Instant::now(), "http://ml:5001", probe);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], "pickup-backend");
        assert_eq!(value["dependencies"]["ml_service"]["status"], "available");
        assert_eq!(value["dependencies"]["ml_service"]["url"], "http://ml:5001");
        assert_eq!(
            value["dependencies"]["ml_service"]["details"]["status"],
            "healthy"
        );
    }

    #[test]
    fn detailed_report_carries_probe_error() {
        let probe = DependencyHealth::unavailable("connection refused");
        let report = DetailedHealth::collect(Instant::now(), "http://ml:5001", probe);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["dependencies"]["ml_service"]["status"], "unavailable");
        assert_eq!(
            value["dependencies"]["ml_service"]["details"]["error"],
            "connection refused"
        );
    }
}
