use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Liveness probe, does not touch the dataset or the store
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
