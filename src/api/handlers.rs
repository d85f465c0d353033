//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;
use crate::health::{BasicHealth, DetailedHealth};
use crate::metrics;
use crate::upstream::{self, MlClient};

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Immutable configuration.
    pub config: Arc<Config>,
    /// Shared ML service client.
    pub ml: MlClient,
    /// Process start time, basis for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config) -> Self {
        let ml = MlClient::new(&config);
        Self {
            config: Arc::new(config),
            ml,
            started_at: Instant::now(),
        }
    }
}

/// Greeting response.
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    /// Fixed greeting message.
    pub message: &'static str,
}

/// Successful prediction response.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// Upstream prediction value, passed through verbatim.
    pub prediction: Value,
}

/// Echo response for accepted payloads.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    /// Always "success".
    pub status: &'static str,
    /// The caller's payload, unchanged.
    pub received: Value,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Greeting handler - always returns 200.
pub async fn hello() -> impl IntoResponse {
    Json(HelloResponse {
        message: "Hello from Flask API!",
    })
}

/// Prediction handler - proxies one upstream call.
///
/// The classified failure cause goes to the log; the client only sees a
/// generic 500 body.
pub async fn predict(State(state): State<AppState>) -> impl IntoResponse {
    match state.ml.fetch_prediction().await {
        Ok(prediction) => {
            metrics::inc_predictions_served();
            Json(PredictionResponse { prediction }).into_response()
        }
        Err(e) => {
            error!(error = %e, "Error getting prediction");
            metrics::inc_prediction_failures();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to get prediction from ML service".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Data intake handler - echoes any well-formed JSON payload.
///
/// A missing or unparseable body is the client's fault and maps to 400.
pub async fn receive_data(payload: Result<Json<Value>, JsonRejection>) -> impl IntoResponse {
    match payload {
        Ok(Json(body)) => {
            debug!(payload = %body, "Received data");
            metrics::inc_payloads_received();
            Json(EchoResponse {
                status: "success",
                received: body,
            })
            .into_response()
        }
        Err(rejection) => {
            error!(error = %rejection, "Error processing data");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Failed to process data".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Basic health handler - liveness only, never touches the upstream.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(BasicHealth::collect(state.started_at))
}

/// Detailed health handler - probes the ML service.
///
/// Always returns 200; dependency trouble is reported in the body, not
/// via the status code.
pub async fn detailed_health(State(state): State<AppState>) -> impl IntoResponse {
    let probe = upstream::check_health(
        state.ml.http(),
        state.ml.base_url(),
        state.ml.probe_timeout(),
    )
    .await;

    Json(DetailedHealth::collect(
        state.started_at,
        state.ml.base_url(),
        probe,
    ))
}

/// Metrics handler - Prometheus text exposition.
pub async fn metrics_text() -> impl IntoResponse {
    metrics::render()
}

/// Fallback handler for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Response;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hello_returns_fixed_greeting() {
        let response = hello().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Hello from Flask API!");
    }

    #[tokio::test]
    async fn echo_wraps_payload() {
        let payload = json!({ "sensor": "door", "open": true });
        let response = receive_data(Ok(Json(payload.clone()))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["received"], payload);
    }

    #[tokio::test]
    async fn not_found_is_json() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "not found");
    }
}
