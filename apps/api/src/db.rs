use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Schema statements, applied in order. Every statement is `IF NOT EXISTS`
/// so the bootstrap can run on every startup.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS app_ideas (
        id            UUID PRIMARY KEY,
        app_name      TEXT NOT NULL,
        user_name     TEXT,
        description   TEXT NOT NULL,
        target_market TEXT NOT NULL,
        budget        TEXT,
        features      TEXT,
        competition   TEXT,
        user_ip       TEXT,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS validation_results (
        id                UUID PRIMARY KEY,
        app_idea_id       UUID NOT NULL REFERENCES app_ideas(id),
        score             DOUBLE PRECISION NOT NULL CHECK (score >= 0 AND score <= 10),
        verdict           TEXT NOT NULL CHECK (verdict IN ('BUILD', 'BAIL', 'CAUTION')),
        strengths         JSONB NOT NULL DEFAULT '[]'::jsonb,
        weaknesses        JSONB NOT NULL DEFAULT '[]'::jsonb,
        opportunities     JSONB NOT NULL DEFAULT '[]'::jsonb,
        detailed_analysis TEXT NOT NULL,
        action_items      JSONB NOT NULL DEFAULT '[]'::jsonb,
        time_saved_hours  DOUBLE PRECISION NOT NULL DEFAULT 0,
        raw_analysis      JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_validation_results_created_at ON validation_results (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_validation_results_verdict_created_at ON validation_results (verdict, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_validation_results_app_idea_id ON validation_results (app_idea_id)",
    r#"
    CREATE TABLE IF NOT EXISTS rate_limits (
        id            UUID PRIMARY KEY,
        user_ip       TEXT NOT NULL UNIQUE,
        window_start  TIMESTAMPTZ NOT NULL,
        request_count INTEGER NOT NULL DEFAULT 0,
        last_request  TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Idempotently creates the tables and indexes the service needs.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("schema bootstrap failed on: {}", statement.trim()))?;
    }
    tx.commit().await?;

    info!("Database schema ensured ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}

/// Postgres access for tests that need a real database. Tests skip when
/// `DATABASE_URL` is unset.
#[cfg(test)]
pub mod testing {
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;

    use super::ensure_schema;

    pub async fn database_pool() -> Option<PgPool> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&url)
            .await
            .expect("DATABASE_URL is set but unreachable");
        ensure_schema(&pool).await.expect("schema bootstrap");
        Some(pool)
    }
}
