//! Liveness handlers.

use axum::Json;
use serde_json::{json, Value};

/// Root banner.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Docent RAG API is running" }))
}

/// Health check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
