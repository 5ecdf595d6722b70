mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod rate_limit;
mod results;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::ClaudeAnalyzer;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::rate_limit::store::PgRateLimiter;
use crate::rate_limit::RateLimitPolicy;
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

    info!("Starting BuildOrBail API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and make sure the tables exist
    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    ensure_schema(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    if config.llm_fallback_enabled {
        info!("LLM fallback enabled: failed analyses will be served a canned CAUTION verdict");
    }

    let policy = RateLimitPolicy::new(config.rate_limit_max_requests, config.rate_limit_window_secs);
    let rate_limiter = PgRateLimiter::new(db.clone(), policy);
    info!(
        "Rate limit: {} submissions per {}s per IP",
        rate_limiter.policy().max_requests,
        rate_limiter.policy().window.num_seconds()
    );

    // Build app state
    let state = AppState {
        db,
        analyzer: Arc::new(ClaudeAnalyzer::new(llm)),
        rate_limiter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
