//! # docent-core
//!
//! Core types, traits, and configuration for the docent RAG service.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other docent crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::Settings;
pub use error::{Error, Result};
pub use models::{DocumentRecord, SearchHit};
pub use traits::{ChatBackend, ChatOutcome, ChatRole, ChatTurn, EmbeddingBackend, ToolSpec, VectorIndex};
