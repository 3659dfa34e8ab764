//! Postgres pool for the video record store.

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tubely_core::Config;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connect and bring the `videos` schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        migrations = MIGRATOR.iter().count(),
        "Video store ready"
    );

    Ok(pool)
}
