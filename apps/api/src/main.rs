mod config;
mod cv;
mod errors;
mod ingest;
mod language;
mod layout;
mod llm_client;
mod routes;
mod sections;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::language::WhatlangDetector;
use crate::layout::default_page_config;
use crate::llm_client::{LlmClient, LlmTranslator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Translator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client and translator
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.translation_model.clone(),
    )
    .context("Failed to build HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());
    let translator = Arc::new(LlmTranslator::new(llm));

    // Language detection falls back to the interface language
    let detector = Arc::new(WhatlangDetector::new(config.interface_language.clone()));
    info!("Language detector fallback: {}", config.interface_language);

    let page_config = default_page_config(config.page_size);
    info!(
        "Page config: {:?} {}x{}mm",
        page_config.paper, page_config.page_width_mm, page_config.page_height_mm
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        translator,
        detector,
        page_config,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
