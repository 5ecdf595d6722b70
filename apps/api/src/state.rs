use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::analyzer::IdeaAnalyzer;
use crate::config::Config;
use crate::rate_limit::store::PgRateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable analyzer. Default: ClaudeAnalyzer.
    pub analyzer: Arc<dyn IdeaAnalyzer>,
    pub rate_limiter: PgRateLimiter,
    pub config: Config,
}
