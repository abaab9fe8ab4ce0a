mod advisory;
mod config;
mod errors;
mod llm_client;
mod models;
mod refdata;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisory::tone::RandomPhraseSelector;
use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::refdata::ReferenceData;
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

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Load reference tables. A defect here is fatal: the process must not
    // serve requests against inconsistent rule data.
    let reference = Arc::new(ReferenceData::load(&config.reference_dir)?);
    info!(
        "Reference data loaded: {} functional areas, {} questions",
        reference.catalog.area_count(),
        reference.catalog.question_count()
    );

    // Initialize LLM client
    let generator = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Phrase selection is random in production; tests swap in a fixed selector
    let selector = Arc::new(RandomPhraseSelector);

    // Build app state
    let state = AppState {
        reference,
        generator,
        selector,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
