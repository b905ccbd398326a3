//! docent-api - HTTP API server for the docent RAG service.
//!
//! The router and application state live in the library target so
//! integration tests can drive the service in-process with mock backends.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use docent_core::{defaults, ChatBackend, EmbeddingBackend, VectorIndex};

pub mod handlers;
pub mod services;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation across the ingest and chat pipelines.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
///
/// All external collaborators are injected as trait objects, constructed
/// once at process start — no module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// Embedding API client.
    pub embedder: Arc<dyn EmbeddingBackend>,
    /// Chat model client.
    pub chat: Arc<dyn ChatBackend>,
    /// Vector index client.
    pub index: Arc<dyn VectorIndex>,
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// API-facing error with an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<docent_core::Error> for ApiError {
    fn from(err: docent_core::Error) -> Self {
        match err {
            docent_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .route("/chat", post(handlers::chat::chat))
        .route("/ingest", post(handlers::ingest::ingest_document))
        .layer(DefaultBodyLimit::max(defaults::MAX_UPLOAD_BYTES))
        .layer(RequestBodyLimitLayer::new(defaults::MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
