//! docent-api server entry point.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use docent_api::{router, AppState};
use docent_core::{Settings, VectorIndex};
use docent_index::{AzureSearchConfig, AzureSearchIndex};
use docent_inference::{GeminiBackend, GeminiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("Failed to load settings")?;

    let gemini = Arc::new(
        GeminiBackend::new(GeminiConfig::from_settings(&settings))
            .context("Failed to create Gemini backend")?,
    );
    let index = Arc::new(
        AzureSearchIndex::new(AzureSearchConfig::from_settings(&settings))
            .context("Failed to create search index client")?,
    );

    // Startup index check is best-effort: a failure is logged but does not
    // abort the process.
    if let Err(e) = index.ensure_exists().await {
        warn!(error = %e, "Could not check/create index on startup; check credentials");
    }

    let state = AppState {
        embedder: gemini.clone(),
        chat: gemini,
        index,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "docent API listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
