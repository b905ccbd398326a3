//! Core traits for docent abstractions.
//!
//! These traits define the seams between the HTTP layer and the external
//! services (embedding API, chat model, vector index), enabling pluggable
//! backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::{DocumentRecord, SearchHit};

// =============================================================================
// EMBEDDING
// =============================================================================

/// Backend that turns text into fixed-length embedding vectors.
///
/// Queries and documents are embedded with different task-type hints, which
/// may change the resulting vector space alignment.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a document for ingestion.
    async fn embed_document(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimension of the vectors this backend produces.
    fn dimension(&self) -> usize;

    /// Name of the embedding model.
    fn model_name(&self) -> &str;
}

// =============================================================================
// CHAT / TOOL CALLING
// =============================================================================

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
    Tool,
}

/// A single turn in a chat conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatTurn {
    /// Text from the user.
    User { text: String },
    /// Final or intermediate text from the model.
    Model { text: String },
    /// A tool call the model requested, echoed back into the history.
    ModelToolCall { name: String, arguments: JsonValue },
    /// The result of executing a tool, fed back to the model.
    ToolResult { name: String, content: String },
}

impl ChatTurn {
    /// Role of this turn.
    pub fn role(&self) -> ChatRole {
        match self {
            ChatTurn::User { .. } => ChatRole::User,
            ChatTurn::Model { .. } | ChatTurn::ModelToolCall { .. } => ChatRole::Model,
            ChatTurn::ToolResult { .. } => ChatRole::Tool,
        }
    }
}

/// Declaration of a tool the model may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name as exposed to the model.
    pub name: String,
    /// Natural-language description guiding when to call the tool.
    pub description: String,
    /// JSON schema of the tool's parameters.
    pub parameters: JsonValue,
}

/// Outcome of a single chat model invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// Final text response.
    Text(String),
    /// The model requests a tool invocation.
    ToolCall { name: String, arguments: JsonValue },
}

/// Backend wrapping a hosted chat model that supports callable tools.
///
/// One invocation is a single remote call: the caller owns the tool loop
/// (execute the requested tool, append a [`ChatTurn::ToolResult`], call
/// again) with an explicit iteration cap.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one model turn over the conversation history.
    async fn chat(&self, history: &[ChatTurn], tools: &[ToolSpec]) -> Result<ChatOutcome>;

    /// Name of the chat model.
    fn model_name(&self) -> &str;
}

// =============================================================================
// VECTOR INDEX
// =============================================================================

/// Remote (or in-memory) vector index supporting hybrid search.
///
/// Each operation is a single stateless call: no retry, pagination, or
/// consistency logic lives behind this trait.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the index if it does not exist yet.
    ///
    /// Idempotent: a pre-existing index is left untouched. Returns `true`
    /// when the index was newly created.
    async fn ensure_exists(&self) -> Result<bool>;

    /// Upsert a single document record.
    async fn upload(&self, record: DocumentRecord) -> Result<()>;

    /// Hybrid search: lexical text match combined with top-k nearest
    /// neighbor vector match.
    async fn search(&self, query: &str, vector: &[f32], top_k: usize) -> Result<Vec<SearchHit>>;

    /// Dimension the index schema was created with.
    fn dimension(&self) -> usize;
}
