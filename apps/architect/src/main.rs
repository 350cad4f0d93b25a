mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod models;
mod render;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::client::AnalysisClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::runtime::SessionRuntime;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing ANTHROPIC_API_KEY is fatal here, before anything else starts.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Architect API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build the HTTP client for the model API")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let client = AnalysisClient::new(Arc::new(llm)).context("Failed to derive the analysis schema")?;
    let runtime = SessionRuntime::new(client, config.generation_timeout);
    info!(
        "Session runtime ready (generation timeout: {}s)",
        config.generation_timeout.as_secs()
    );

    let state = AppState {
        runtime: Arc::new(runtime),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
