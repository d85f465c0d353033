//! HTTP API route definitions.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    detailed_health, health, hello, metrics_text, not_found, predict, receive_data, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API endpoints
        .route("/api/hello", get(hello))
        .route("/api/predict", get(predict))
        // Payloads of any size are echoed verbatim; no body cap
        .route(
            "/api/send-data",
            post(receive_data).layer(DefaultBodyLimit::disable()),
        )
        // Health endpoints
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
        // Metrics endpoint
        .route("/metrics", get(metrics_text))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
