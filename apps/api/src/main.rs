mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod portfolio;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::portfolio::cache::CacheStamp;
use crate::portfolio::import::LlmResumeParser;
use crate::portfolio::store::PgPortfolioStore;
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

    info!("Starting folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;

    // Public cache invalidation stamp; bumped by the store on every write
    let cache = CacheStamp::new();
    let mut invalidations = cache.subscribe();
    tokio::spawn(async move {
        while invalidations.changed().await.is_ok() {
            let generation = *invalidations.borrow_and_update();
            info!(generation, "public portfolio pages marked stale");
        }
    });

    // Persistence gateway
    let store = Arc::new(PgPortfolioStore::new(pool, cache.clone()));

    // LLM-backed resume parser (text -> OpenAI, binary documents -> Anthropic)
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.openai_api_key.clone(),
    );
    let parser = Arc::new(LlmResumeParser::new(llm));
    info!(
        "LLM client initialized (text: {}, document: {})",
        llm_client::OPENAI_MODEL,
        llm_client::ANTHROPIC_MODEL
    );

    // Build app state
    let app_state = AppState {
        store,
        parser,
        cache,
    };

    // Build router
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
