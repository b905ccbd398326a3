//! Environment-derived settings.
//!
//! Settings are loaded once at process start and injected into the
//! services that need them. Secrets have no defaults: startup fails with
//! [`Error::Config`] when a required variable is absent.

use std::env;

use crate::defaults;
use crate::error::{Error, Result};

/// Runtime configuration, sourced from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Google Gemini API key (`GEMINI_API_KEY`, required).
    pub gemini_api_key: String,
    /// Gemini REST API base URL (`GEMINI_BASE_URL`).
    pub gemini_base_url: String,
    /// Chat/generation model (`GEMINI_MODEL`).
    pub gemini_model: String,
    /// Embedding model (`GEMINI_EMBED_MODEL`).
    pub gemini_embed_model: String,
    /// Azure AI Search endpoint (`AZURE_SEARCH_ENDPOINT`, required).
    pub search_endpoint: String,
    /// Azure AI Search admin key (`AZURE_SEARCH_KEY`, required).
    pub search_key: String,
    /// Vector index name (`AZURE_SEARCH_INDEX_NAME`).
    pub search_index_name: String,
    /// HTTP server bind address (`DOCENT_BIND_ADDR`).
    pub bind_addr: String,
}

/// Read a required environment variable.
fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(Error::Config(format!("{} is not set", name))),
    }
}

/// Read an optional environment variable with a default.
fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Result<Self> {
        let settings = Self {
            gemini_api_key: require("GEMINI_API_KEY")?,
            gemini_base_url: optional("GEMINI_BASE_URL", defaults::GEMINI_BASE_URL),
            gemini_model: optional("GEMINI_MODEL", defaults::GEN_MODEL),
            gemini_embed_model: optional("GEMINI_EMBED_MODEL", defaults::EMBED_MODEL),
            search_endpoint: require("AZURE_SEARCH_ENDPOINT")?,
            search_key: require("AZURE_SEARCH_KEY")?,
            search_index_name: optional("AZURE_SEARCH_INDEX_NAME", defaults::INDEX_NAME),
            bind_addr: optional("DOCENT_BIND_ADDR", defaults::BIND_ADDR),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the loaded settings.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("GEMINI_BASE_URL", &self.gemini_base_url),
            ("AZURE_SEARCH_ENDPOINT", &self.search_endpoint),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, url
                )));
            }
        }
        Ok(())
    }
}
