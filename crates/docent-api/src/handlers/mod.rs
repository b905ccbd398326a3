//! HTTP handlers for docent-api.

pub mod chat;
pub mod ingest;
pub mod system;
