//! # docent-inference
//!
//! Gemini (Generative Language API) backend for docent: text embeddings
//! with query/document task types, and tool-capable chat generation.

pub mod gemini;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use gemini::{GeminiBackend, GeminiConfig};
