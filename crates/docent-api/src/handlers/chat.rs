//! Chat HTTP handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::agent::QueryProcessor;
use crate::{ApiError, AppState};

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Free-text user message.
    pub message: String,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Final answer text from the model.
    pub response: String,
    /// Distinct source filenames retrieved while answering.
    pub sources: Vec<String>,
}

/// Answer a free-text query against the indexed knowledge base.
///
/// Delegates to the query processor, which runs the explicit tool-calling
/// loop. Any failure is logged and surfaced as a 500 with the error message.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let processor = QueryProcessor::new(state.embedder, state.chat, state.index);

    let reply = processor.process(&request.message).await.map_err(|e| {
        error!(error = %e, "Error processing query");
        ApiError::from(e)
    })?;

    Ok(Json(ChatResponse {
        response: reply.response,
        sources: reply.sources,
    }))
}
