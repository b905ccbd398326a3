//! Service modules for docent-api.

pub mod agent;
pub mod extract;
