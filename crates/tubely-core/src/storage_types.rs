use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Where uploaded objects live. Selected by `STORAGE_BACKEND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    /// Development only; this service serves the signed URLs itself.
    Local,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown storage backend {0:?}, expected \"s3\" or \"local\"")]
pub struct UnknownStorageBackend(pub String);

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::S3 => "s3",
            StorageBackend::Local => "local",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = UnknownStorageBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        [StorageBackend::S3, StorageBackend::Local]
            .into_iter()
            .find(|backend| backend.as_str() == normalized)
            .ok_or_else(|| UnknownStorageBackend(s.to_string()))
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
