//! Storage abstraction trait
//!
//! Every backend implements [`Storage`]: a streamed put from a local file and a
//! time-bounded signed GET URL.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket new uploads are written to.
    fn bucket(&self) -> &str;

    /// Stream the file at `source` from its first byte to `key`, tagging it with
    /// `content_type`. Either the whole object is stored or an error is returned;
    /// no partial object is left behind.
    async fn upload_file(&self, key: &str, source: &Path, content_type: &str)
        -> StorageResult<()>;

    /// Signed, time-bounded GET URL for `bucket`/`key`. Each call yields a fresh URL.
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
