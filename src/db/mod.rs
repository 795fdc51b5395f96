//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "TRIAGE_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "TRIAGE_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "TRIAGE_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "TRIAGE_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "TRIAGE_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "triage";
const DEFAULT_POSTGRES_PASSWORD: &str = "triage";
const DEFAULT_POSTGRES_DB: &str = "triage";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    // Create table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS screening_results (
            paper_id VARCHAR(64) PRIMARY KEY,
            decision VARCHAR(16) NOT NULL,
            reasoning TEXT NOT NULL,
            dual_component VARCHAR(16),
            criteria JSONB,
            counts JSONB,
            extraction_error TEXT,
            model_used VARCHAR(100) NOT NULL,
            screened_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            processing_time_ms BIGINT NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_screening_results_decision ON screening_results(decision)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_screening_results_screened_at ON screening_results(screened_at)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
