//! Storage setup and initialization

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_storage::{create_storage, ConfiguredStorage};

pub async fn setup_storage(config: &Config) -> Result<ConfiguredStorage> {
    tracing::info!("Initializing storage...");
    let configured = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    let storage = configured.storage();
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %storage.bucket(),
        "Storage initialized successfully"
    );

    Ok(configured)
}
