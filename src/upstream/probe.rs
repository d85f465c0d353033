//! Health probe for the upstream ML service.
//!
//! Unlike the predict proxy, the probe never fails: success, bad status,
//! timeout, and unreachable host all fold into a [`DependencyHealth`]
//! value for the detailed health report.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumString};
use tracing::{debug, instrument};

use crate::metrics;

/// Reachability classification for the upstream dependency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DependencyStatus {
    /// Upstream answered 200 with a readable JSON body.
    Available,
    /// Upstream answered, but with a status other than 200.
    Degraded,
    /// Upstream could not be reached, timed out, or sent an unreadable body.
    Unavailable,
}

impl DependencyStatus {
    /// Check if the dependency answered at all.
    pub fn is_reachable(&self) -> bool {
        matches!(self, DependencyStatus::Available | DependencyStatus::Degraded)
    }
}

/// Probe result for one dependency.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyHealth {
    /// Reachability classification.
    pub status: DependencyStatus,
    /// Parsed upstream body on success, `{"error": <message>}` otherwise.
    pub details: Value,
}

impl DependencyHealth {
    /// Probe succeeded; details carry the upstream body.
    pub fn available(details: Value) -> Self {
        Self {
            status: DependencyStatus::Available,
            details,
        }
    }

    /// Upstream answered with an unexpected status.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            status: DependencyStatus::Degraded,
            details: json!({ "error": error.into() }),
        }
    }

    /// Upstream transport failed or the body was unreadable.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            status: DependencyStatus::Unavailable,
            details: json!({ "error": error.into() }),
        }
    }
}

/// Probe the ML service health endpoint, absorbing every failure.
///
/// A 200 with a JSON body maps to [`DependencyStatus::Available`], any
/// other status to [`DependencyStatus::Degraded`], and transport errors,
/// timeouts, or unreadable bodies to [`DependencyStatus::Unavailable`].
#[instrument(skip(http))]
pub async fn check_health(
    http: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> DependencyHealth {
    let url = format!("{}/health", base_url);
    let start = Instant::now();

    let response = match http.get(&url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "Upstream health probe failed");
            return DependencyHealth::unavailable(e.to_string());
        }
    };

    metrics::record_upstream_latency(start, "health");

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return DependencyHealth::degraded(format!("Returned status code {}", status.as_u16()));
    }

    match response.json::<Value>().await {
        Ok(body) => DependencyHealth::available(body),
        Err(e) => {
            debug!(error = %e, "Upstream health body was unreadable");
            DependencyHealth::unavailable(e.to_string())
        }
    }
}
