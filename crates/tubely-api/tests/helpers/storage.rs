use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory object store with switchable failures.
pub struct MemoryStorage {
    bucket: String,
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
    fail_signing: AtomicBool,
    signatures: AtomicU64,
}

impl MemoryStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(HashMap::new()),
            fail_uploads: AtomicBool::new(false),
            fail_signing: AtomicBool::new(false),
            signatures: AtomicU64::new(0),
        }
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn fail_signing(&self) {
        self.fail_signing.store(true, Ordering::SeqCst);
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_file(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "503 Slow Down from s3.us-east-1.amazonaws.com".to_string(),
            ));
        }
        let bytes = tokio::fs::read(source).await?;
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("no credentials".to_string()));
        }
        let n = self.signatures.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://{}.s3.test/{}?X-Amz-Expires={}&X-Amz-Signature=sig{}",
            bucket,
            key,
            expires_in.as_secs(),
            n
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
