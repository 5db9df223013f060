mod analysis;
mod config;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ExtractorRegistry;
use crate::llm_client::{GeminiClient, GeminiSettings, GenerationConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GeminiClient::new(GeminiSettings {
        api_key: config.google_api_key.clone(),
        model: config.gemini_model.clone(),
        base_url: config.gemini_api_base.clone(),
        generation: GenerationConfig::default(),
    })?;
    info!("LLM client initialized (model: {})", llm.model());

    let extractors = ExtractorRegistry::default();
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    // Build app state
    let state = AppState {
        config: config.clone(),
        extractors,
        llm: Arc::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
