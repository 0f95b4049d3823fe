use axum::{http::Uri, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness probe; deliberately does not check the inference service.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "dermagen-service",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "DermaGen Backend API is running"
    }))
}

pub async fn metrics() -> impl IntoResponse {
    service_core::observability::render_metrics()
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
