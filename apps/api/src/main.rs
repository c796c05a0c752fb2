mod config;
mod errors;
mod extract;
mod llm_client;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extract::ExtractorRegistry;
use crate::llm_client::LlmClient;
use crate::matching::embedding::{EmbeddingProvider, FastEmbedProvider};
use crate::matching::pipeline::{MatchPipeline, MatchSettings};
use crate::matching::summary::LlmSummaryGenerator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume matcher v{}", env!("CARGO_PKG_VERSION"));

    // Load the embedding model once; it is shared read-only by every run
    let cache_dir = config.embedding_cache_dir.clone();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        tokio::task::spawn_blocking(move || FastEmbedProvider::load(cache_dir))
            .await
            .context("embedding model loader panicked")??,
    );
    info!("Embedding provider ready: {}", embedder.model_name());

    // Initialize LLM client with the credential resolved above
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let settings = MatchSettings::default();
    let summarizer = Arc::new(LlmSummaryGenerator::new(llm, settings.completion));
    info!(
        "Match settings: top_k={}, summary interval={}ms",
        settings.top_k,
        settings.summary_interval.as_millis()
    );

    let pipeline = MatchPipeline::new(
        Arc::new(ExtractorRegistry::default()),
        embedder,
        summarizer,
        settings,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
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
