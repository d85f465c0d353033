//! Unified error types for the gateway.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Upstream ML service error.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classified failures from the upstream ML service.
///
/// A single outbound call produces exactly one of these; the router maps
/// all of them to a 500 with a generic message and logs the detail.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The upstream did not answer within the configured timeout.
    #[error("upstream timed out after {seconds}s")]
    Timeout {
        /// Timeout that elapsed, in seconds.
        seconds: u64,
    },

    /// The upstream answered with a non-success status code.
    #[error("upstream returned status code {status}")]
    Status {
        /// The status code received.
        status: reqwest::StatusCode,
    },

    /// The upstream could not be reached at the transport level.
    #[error("upstream unreachable: {0}")]
    Unavailable(String),

    /// The upstream answered 2xx but the body was not usable.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl UpstreamError {
    /// Classify a transport-level `reqwest` error.
    ///
    /// Timeouts and body-decode failures get their own variants; everything
    /// else (DNS, connect, TLS) collapses into [`UpstreamError::Unavailable`].
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                seconds: timeout.as_secs(),
            }
        } else if err.is_decode() {
            UpstreamError::MalformedResponse(err.to_string())
        } else {
            UpstreamError::Unavailable(err.to_string())
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, GatewayError>;
