use anyhow::{ensure, Context, Result};

use crate::rate_limit::MAX_WINDOW_SECS;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub rate_limit_max_requests: i32,
    pub rate_limit_window_secs: i64,
    /// When set, LLM failures are masked with a canned CAUTION analysis.
    pub llm_fallback_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", 5)?,
            rate_limit_window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", 3600)?,
            llm_fallback_enabled: parse_bool(
                std::env::var("LLM_FALLBACK_ENABLED").ok().as_deref(),
            )
            .context("LLM_FALLBACK_ENABLED must be true/false")?,
        };

        check_rate_limit(config.rate_limit_max_requests, config.rate_limit_window_secs)?;
        Ok(config)
    }
}

fn check_rate_limit(max_requests: i32, window_secs: i64) -> Result<()> {
    ensure!(
        max_requests >= 1,
        "RATE_LIMIT_MAX_REQUESTS must be at least 1 (got {max_requests})"
    );
    ensure!(
        (1..=MAX_WINDOW_SECS).contains(&window_secs),
        "RATE_LIMIT_WINDOW_SECS must be between 1 and {MAX_WINDOW_SECS} (got {window_secs})"
    );
    Ok(())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Unset means false. Accepts the usual spellings.
fn parse_bool(raw: Option<&str>) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => anyhow::bail!("unrecognized boolean '{other}'"),
    }
}
