//! Default values and named constants used across docent crates.

/// Base URL for the Gemini (Generative Language) REST API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default chat/generation model.
pub const GEN_MODEL: &str = "gemini-1.5-flash";

/// Default embedding model.
pub const EMBED_MODEL: &str = "text-embedding-004";

/// Embedding dimension for text-embedding-004. The vector index schema is
/// created with this dimension, and every upserted vector must match it.
pub const EMBED_DIMENSION: usize = 768;

/// Default vector index name.
pub const INDEX_NAME: &str = "rag-index";

/// Azure AI Search REST API version.
pub const SEARCH_API_VERSION: &str = "2023-11-01";

/// Number of hits retrieved per knowledge search.
pub const SEARCH_TOP_K: usize = 3;

/// Maximum number of tool-call round trips per chat query. Bounds cost and
/// latency of the explicit tool loop.
pub const MAX_TOOL_TURNS: usize = 4;

/// Timeout for embedding requests (seconds).
pub const EMBED_TIMEOUT_SECS: u64 = 60;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Timeout for vector index requests (seconds).
pub const SEARCH_TIMEOUT_SECS: u64 = 30;

/// Timeout for a single external extraction command (seconds).
pub const EXTRACTION_CMD_TIMEOUT_SECS: u64 = 60;

/// Maximum accepted upload body size in bytes (50 MiB).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default bind address for the HTTP server.
pub const BIND_ADDR: &str = "0.0.0.0:8000";
