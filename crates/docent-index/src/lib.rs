//! # docent-index
//!
//! Vector index clients for docent: a thin Azure AI Search REST wrapper
//! (index creation, document upload, hybrid search) and an in-memory
//! index for tests and local development.

pub mod azure;
pub mod memory;
pub mod types;

pub use azure::{AzureSearchConfig, AzureSearchIndex};
pub use memory::MemoryIndex;
