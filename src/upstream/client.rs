//! HTTP client for the upstream ML service.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::UpstreamError;
use crate::metrics;

/// Client for the upstream ML service.
///
/// Wraps a pooled `reqwest::Client`; cloning is cheap and all clones share
/// the connection pool. Timeouts are applied per request so the predict
/// call and the health probe can use different limits.
#[derive(Debug, Clone)]
pub struct MlClient {
    /// HTTP client for outbound requests.
    http: reqwest::Client,
    /// Base URL of the ML service.
    base_url: String,
    /// Total timeout for the predict call.
    predict_timeout: Duration,
    /// Total timeout for the health probe.
    probe_timeout: Duration,
}

impl MlClient {
    /// Create a new ML service client from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            // Fast connection establishment
            .connect_timeout(Duration::from_secs(2))
            // Keep connections alive for reuse
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            base_url: config.ml_service_url.clone(),
            predict_timeout: config.upstream_timeout(),
            probe_timeout: config.probe_timeout(),
        }
    }

    /// Get the HTTP client reference.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the ML service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the health probe timeout.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Fetch one prediction from the ML service.
    ///
    /// Single attempt, no retry. The returned value is the upstream body's
    /// `prediction` field, passed through verbatim.
    #[instrument(skip(self))]
    pub async fn fetch_prediction(&self) -> Result<Value, UpstreamError> {
        let url = format!("{}/predict", self.base_url);
        let start = Instant::now();

        let response = self
            .http
            .get(&url)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_transport(e, self.predict_timeout))?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_upstream_latency(start, "predict");
            return Err(UpstreamError::Status { status });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_transport(e, self.predict_timeout))?;

        metrics::record_upstream_latency(start, "predict");

        let prediction = body.get("prediction").cloned().ok_or_else(|| {
            UpstreamError::MalformedResponse("missing 'prediction' field".to_string())
        })?;

        debug!(prediction = %prediction, "Retrieved prediction");

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn test_config() -> Config {
        Config {
            ml_service_url: "http://127.0.0.1:5001".to_string(),
            port: 5000,
            rust_log: "info".to_string(),
            secret_key: "dev-secret-key".to_string(),
            app_env: Environment::Testing,
            upstream_timeout_secs: 10,
            probe_timeout_secs: 5,
        }
    }

    #[test]
    fn client_creation_works() {
        let config = test_config();
        let client = MlClient::new(&config);
        assert_eq!(client.base_url(), "http://127.0.0.1:5001");
        assert_eq!(client.probe_timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_classified() {
        let mut config = test_config();
        // Nothing listens on the discard port; connection is refused.
        config.ml_service_url = "http://127.0.0.1:9".to_string();
        config.upstream_timeout_secs = 1;

        let client = MlClient::new(&config);
        let err = client.fetch_prediction().await.unwrap_err();

        assert!(matches!(
            err,
            UpstreamError::Unavailable(_) | UpstreamError::Timeout { .. }
        ));
    }
}
