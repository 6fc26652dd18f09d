use crate::core::config::DatabaseConfig;
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Build the Postgres pool and bring the schema up to date.
///
/// Migrations are embedded in the binary, so a fresh database is ready to
/// serve as soon as this returns.
pub async fn init(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Migration failed")?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}
