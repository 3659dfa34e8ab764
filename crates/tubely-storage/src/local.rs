//! Local filesystem storage for development.
//!
//! Objects live at `{base_path}/{bucket}/{key}` with the declared content type in a
//! `{key}.content-type` sidecar. Signed URLs take the form
//! `{base_url}/{bucket}/{key}?expires={unix}&signature={sig}` where
//! `sig = base64url(HMAC-SHA256(secret, bucket "\n" key "\n" expires))`.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const CONTENT_TYPE_SUFFIX: &str = ".content-type";
const PARTIAL_SUFFIX: &str = ".partial";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An object opened after its signed URL was verified.
pub struct LocalObject {
    pub file: tokio::fs::File,
    pub content_type: String,
    pub size: u64,
}

#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signing_secret: Vec<u8>,
}

impl LocalStorage {
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
        signing_secret: &[u8],
    ) -> StorageResult<Self> {
        let base_path = base_path.into();
        validate_bucket(&bucket)?;
        if signing_secret.is_empty() {
            return Err(StorageError::ConfigError(
                "Local storage signing secret must not be empty".to_string(),
            ));
        }

        tokio::fs::create_dir_all(base_path.join(&bucket)).await?;

        Ok(Self {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            signing_secret: signing_secret.to_vec(),
        })
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_bucket(bucket)?;
        validate_key(key)?;
        Ok(self.base_path.join(bucket).join(key))
    }

    fn mac(&self, bucket: &str, key: &str, expires: u64) -> StorageResult<Hmac<Sha256>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.signing_secret)
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        mac.update(bucket.as_bytes());
        mac.update(b"\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    fn signature(&self, bucket: &str, key: &str, expires: u64) -> StorageResult<String> {
        let tag = self.mac(bucket, key, expires)?.finalize().into_bytes();
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tag))
    }

    /// Verify a signed request and open the object it names.
    ///
    /// Bad or expired signatures are reported as `NotFound` so a probe cannot tell
    /// them apart from a missing object.
    pub async fn open_signed(
        &self,
        bucket: &str,
        key: &str,
        expires: u64,
        signature: &str,
    ) -> StorageResult<LocalObject> {
        let path = self.object_path(bucket, key)?;

        let provided = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| StorageError::NotFound(key.to_string()))?;
        self.mac(bucket, key, expires)?
            .verify_slice(&provided)
            .map_err(|_| StorageError::NotFound(key.to_string()))?;

        if unix_now() > expires {
            tracing::debug!(bucket = %bucket, key = %key, expires, "Signed URL expired");
            return Err(StorageError::NotFound(key.to_string()));
        }

        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };
        let size = file.metadata().await?.len();
        let content_type = tokio::fs::read_to_string(sidecar_path(&path))
            .await
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string());

        Ok(LocalObject {
            file,
            content_type,
            size,
        })
    }
}

fn validate_bucket(bucket: &str) -> StorageResult<()> {
    let valid = !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !bucket.contains("..");
    if !valid {
        return Err(StorageError::InvalidKey(format!(
            "Invalid bucket name: {}",
            bucket
        )));
    }
    Ok(())
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(CONTENT_TYPE_SUFFIX);
    PathBuf::from(name)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_file(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let dest = self.object_path(&self.bucket, key)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Copy next to the destination, then rename, so readers never see a partial object.
        let partial = partial_path(&dest);
        let result = async {
            let size = tokio::fs::copy(source, &partial).await?;
            tokio::fs::write(sidecar_path(&dest), content_type).await?;
            tokio::fs::rename(&partial, &dest).await?;
            Ok::<u64, std::io::Error>(size)
        }
        .await;

        match result {
            Ok(size) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    content_type = %content_type,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local upload successful"
                );
                Ok(())
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                tracing::error!(error = %e, key = %key, "Local upload failed");
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
        validate_bucket(bucket)?;
        validate_key(key)?;
        let expires = unix_now().saturating_add(expires_in.as_secs());
        let signature = self.signature(bucket, key, expires)?;
        Ok(format!(
            "{}/{}/{}?expires={}&signature={}",
            self.base_url, bucket, key, expires, signature
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    const SECRET: &[u8] = b"local-signing-secret-for-tests-0123";

    async fn storage(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(
            dir.path(),
            "http://localhost:8091/assets/".to_string(),
            "tubely-local".to_string(),
            SECRET,
        )
        .await
        .unwrap()
    }

    fn query_param<'a>(url: &'a str, name: &str) -> &'a str {
        let query = url.split_once('?').unwrap().1;
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{}=", name)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_open_signed() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let source = dir.path().join("source.mp4");
        tokio::fs::write(&source, b"fake mp4 bytes").await.unwrap();

        storage
            .upload_file("landscape/abc.mp4", &source, "video/mp4")
            .await
            .unwrap();

        let url = storage
            .presigned_get_url("tubely-local", "landscape/abc.mp4", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:8091/assets/tubely-local/landscape/abc.mp4?"));

        let expires: u64 = query_param(&url, "expires").parse().unwrap();
        let signature = query_param(&url, "signature");
        let mut object = storage
            .open_signed("tubely-local", "landscape/abc.mp4", expires, signature)
            .await
            .unwrap();

        assert_eq!(object.content_type, "video/mp4");
        assert_eq!(object.size, 14);
        let mut body = Vec::new();
        object.file.read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"fake mp4 bytes");
        assert!(!partial_path(&dir.path().join("tubely-local/landscape/abc.mp4")).exists());
    }

    #[tokio::test]
    async fn test_tampered_signature_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let source = dir.path().join("source.png");
        tokio::fs::write(&source, b"png").await.unwrap();
        storage.upload_file("thumb.png", &source, "image/png").await.unwrap();

        let url = storage
            .presigned_get_url("tubely-local", "thumb.png", Duration::from_secs(60))
            .await
            .unwrap();
        let expires: u64 = query_param(&url, "expires").parse().unwrap();
        let signature = query_param(&url, "signature");

        // Extending the expiry invalidates the signature.
        let result = storage
            .open_signed("tubely-local", "thumb.png", expires + 3600, signature)
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));

        let result = storage
            .open_signed("tubely-local", "thumb.png", expires, "not-a-signature")
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_signature_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let source = dir.path().join("source.png");
        tokio::fs::write(&source, b"png").await.unwrap();
        storage.upload_file("old.png", &source, "image/png").await.unwrap();

        let expires = unix_now() - 10;
        let signature = storage.signature("tubely-local", "old.png", expires).unwrap();
        let result = storage
            .open_signed("tubely-local", "old.png", expires, &signature)
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_signing_twice_yields_independent_valid_urls() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let first = storage
            .presigned_get_url("tubely-local", "a.png", Duration::from_secs(60))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = storage
            .presigned_get_url("tubely-local", "a.png", Duration::from_secs(60))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(first.split('?').next(), second.split('?').next());
    }

    #[tokio::test]
    async fn test_upload_failure_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;

        let result = storage
            .upload_file("missing.mp4", &dir.path().join("nope.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!dir.path().join("tubely-local/missing.mp4").exists());
        assert!(!dir.path().join("tubely-local/missing.mp4.partial").exists());
    }

    #[tokio::test]
    async fn test_invalid_bucket_and_key_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        assert!(storage
            .presigned_get_url("../etc", "a.png", Duration::from_secs(1))
            .await
            .is_err());
        assert!(storage
            .presigned_get_url("tubely-local", "../a.png", Duration::from_secs(1))
            .await
            .is_err());
    }
}
