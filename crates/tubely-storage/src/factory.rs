#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// The backend selected by configuration.
///
/// The local backend stays concrete because the API also serves its signed URLs.
#[derive(Clone)]
pub enum ConfiguredStorage {
    #[cfg(feature = "storage-s3")]
    S3(Arc<S3Storage>),
    #[cfg(feature = "storage-local")]
    Local(Arc<LocalStorage>),
}

impl ConfiguredStorage {
    pub fn storage(&self) -> Arc<dyn Storage> {
        match self {
            #[cfg(feature = "storage-s3")]
            ConfiguredStorage::S3(storage) => storage.clone(),
            #[cfg(feature = "storage-local")]
            ConfiguredStorage::Local(storage) => storage.clone(),
        }
    }

    #[cfg(feature = "storage-local")]
    pub fn local(&self) -> Option<Arc<LocalStorage>> {
        match self {
            ConfiguredStorage::Local(storage) => Some(storage.clone()),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> StorageResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
}

/// Build the backend named by `STORAGE_BACKEND` (S3 when unset).
pub async fn create_storage(config: &Config) -> StorageResult<ConfiguredStorage> {
    match config.storage_backend().unwrap_or(StorageBackend::S3) {
        StorageBackend::S3 => s3_from_config(config).await,
        StorageBackend::Local => local_from_config(config).await,
    }
}

#[cfg(feature = "storage-s3")]
async fn s3_from_config(config: &Config) -> StorageResult<ConfiguredStorage> {
    let bucket = required(config.s3_bucket(), "S3_BUCKET")?;
    // S3_REGION wins over the SDK-wide AWS_REGION.
    let region = required(config.s3_region().or(config.aws_region()), "S3_REGION")?;

    let storage = S3Storage::new(
        bucket.to_string(),
        region.to_string(),
        config.s3_endpoint().map(String::from),
    )
    .await?;
    Ok(ConfiguredStorage::S3(Arc::new(storage)))
}

#[cfg(not(feature = "storage-s3"))]
async fn s3_from_config(_config: &Config) -> StorageResult<ConfiguredStorage> {
    Err(StorageError::ConfigError(
        "S3 backend not compiled in (enable the storage-s3 feature)".to_string(),
    ))
}

#[cfg(feature = "storage-local")]
async fn local_from_config(config: &Config) -> StorageResult<ConfiguredStorage> {
    let root = required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?;
    let base_url = required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?;

    let storage = LocalStorage::new(
        root,
        base_url.trim_end_matches('/').to_string(),
        config.local_storage_bucket().to_string(),
        config.local_storage_signing_secret().as_bytes(),
    )
    .await?;
    Ok(ConfiguredStorage::Local(Arc::new(storage)))
}

#[cfg(not(feature = "storage-local"))]
async fn local_from_config(_config: &Config) -> StorageResult<ConfiguredStorage> {
    Err(StorageError::ConfigError(
        "Local backend not compiled in (enable the storage-local feature)".to_string(),
    ))
}
