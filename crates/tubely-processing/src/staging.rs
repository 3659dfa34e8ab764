//! Request-scoped temporary files.
//!
//! A [`StagedFile`] owns its path and removes the file when dropped, on every exit
//! path of the request that created it.

use crate::error::StagingError;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

const STAGED_FILE_PREFIX: &str = "tubely-upload-";

/// Directory uploads are staged into.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Uses the system temp directory when `dir` is `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        let dir = dir.unwrap_or_else(std::env::temp_dir);
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `stream` chunk by chunk into a fresh, uniquely named file.
    ///
    /// The file is guarded from the moment it exists, so a failed write or a broken
    /// stream still removes it.
    #[tracing::instrument(skip(self, stream), fields(staging.dir = %self.dir.display()))]
    pub async fn stage<S, E>(&self, mut stream: S, suffix: &str) -> Result<StagedFile, StagingError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let start = std::time::Instant::now();
        let named = tempfile::Builder::new()
            .prefix(STAGED_FILE_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.dir)
            .map_err(StagingError::Create)?;
        let (file, path) = named.into_parts();
        let mut staged = StagedFile {
            path,
            size_bytes: 0,
        };

        let mut file = tokio::fs::File::from_std(file);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StagingError::Source(e.into()))?;
            file.write_all(&chunk).await.map_err(StagingError::Write)?;
            staged.size_bytes += chunk.len() as u64;
        }
        file.flush().await.map_err(StagingError::Write)?;
        drop(file);

        tracing::debug!(
            path = %staged.path().display(),
            size_bytes = staged.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );
        Ok(staged)
    }
}

/// A staged file that is deleted when this guard is dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    size_bytes: u64,
}

impl StagedFile {
    /// Guard a path that another process is about to create. Nothing needs to exist yet;
    /// whatever is there when the guard drops is removed. Relative paths resolve against
    /// the working directory; an empty path is an error.
    pub fn claim(path: PathBuf) -> io::Result<Self> {
        Ok(Self {
            path: TempPath::try_from_path(path)?,
            size_bytes: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written while staging; 0 for claimed paths.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // TempPath removes the file right after this.
        tracing::debug!(path = %self.path.display(), "Releasing staged file");
    }
}
