use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<AmazonS3>,
    // Credentials/region/endpoint without a bucket; used to sign references to other buckets.
    builder: AmazonS3Builder,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name new uploads go to
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env().with_region(region);

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        Self::from_builder(builder, bucket)
    }

    /// Build from an explicit builder (credentials, region, endpoint already set).
    pub fn from_builder(builder: AmazonS3Builder, bucket: String) -> StorageResult<Self> {
        if bucket.is_empty() || bucket.contains(',') {
            return Err(StorageError::ConfigError(format!(
                "Invalid S3 bucket name: {:?}",
                bucket
            )));
        }

        let store = builder
            .clone()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            builder,
            bucket,
        })
    }

    fn store_for_bucket(&self, bucket: &str) -> StorageResult<Arc<AmazonS3>> {
        if bucket == self.bucket {
            return Ok(Arc::clone(&self.store));
        }

        tracing::debug!(bucket = %bucket, "Building signer for non-default bucket");
        let store = self
            .builder
            .clone()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        Ok(Arc::new(store))
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_file(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(key)?;
        let start = std::time::Instant::now();

        // Opened fresh, so the transfer always starts at byte 0.
        let mut file = tokio::fs::File::open(source).await?;
        let size = file.metadata().await?.len();

        let attributes = Attributes::from_iter([(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        )]);
        let store: Arc<dyn ObjectStore> = Arc::clone(&self.store) as Arc<dyn ObjectStore>;
        let mut writer =
            BufWriter::new(store, ObjectPath::from(key.to_string())).with_attributes(attributes);

        let copied = match tokio::io::copy(&mut file, &mut writer).await {
            Ok(copied) => writer.shutdown().await.map(|_| copied),
            Err(e) => Err(e),
        };

        match copied {
            Ok(copied) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    content_type = %content_type,
                    size_bytes = copied,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload successful"
                );
                Ok(())
            }
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %key,
                        "Failed to abort S3 multipart upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                Err(StorageError::UploadFailed(e.to_string()))
            }
        }
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for_bucket(bucket)?;
        let location = ObjectPath::from(key.to_string());

        let url = store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;

        Ok(url.to_string())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
