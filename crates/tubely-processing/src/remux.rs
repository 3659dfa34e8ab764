//! Fast-start remux: copy streams into a new MP4 with the `moov` atom up front.

use crate::command::{validate_executable, validate_media_path, CommandRunner};
use crate::error::ProcessingError;
use crate::staging::StagedFile;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const OUTPUT_SUFFIX: &str = ".processing";

pub struct Remuxer {
    runner: Arc<dyn CommandRunner>,
    ffmpeg_path: String,
}

impl Remuxer {
    pub fn new(ffmpeg_path: String, runner: Arc<dyn CommandRunner>) -> Result<Self, ProcessingError> {
        validate_executable(&ffmpeg_path)?;
        Ok(Self {
            runner,
            ffmpeg_path,
        })
    }

    /// `<input>.processing`; placement is a pure function of the input path.
    pub fn output_path_for(input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(OUTPUT_SUFFIX);
        PathBuf::from(name)
    }

    fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-v".into(),
            "error".into(),
            "-i".into(),
            input.as_os_str().to_os_string(),
            "-c".into(),
            "copy".into(),
            "-movflags".into(),
            "faststart".into(),
            "-f".into(),
            "mp4".into(),
            output.as_os_str().to_os_string(),
        ]
    }

    /// Repackage `input` without re-encoding. The returned guard owns the output file;
    /// on failure any partial output is removed before the error is returned.
    #[tracing::instrument(skip(self, input), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "remux_faststart",
        input = %input.path().display()
    ))]
    pub async fn remux(&self, input: &StagedFile) -> Result<StagedFile, ProcessingError> {
        let start = std::time::Instant::now();
        validate_media_path(input.path())?;

        let output_path = Self::output_path_for(input.path());
        let output = StagedFile::claim(output_path.clone()).map_err(|e| {
            ProcessingError::InvalidPath(format!("{}: {}", output_path.display(), e))
        })?;

        self.runner
            .run(&self.ffmpeg_path, &Self::args(input.path(), &output_path))
            .await?
            .ensure_success("ffmpeg")?;

        if tokio::fs::metadata(&output_path).await.is_err() {
            return Err(ProcessingError::MissingOutput {
                program: "ffmpeg".to_string(),
                path: output_path.display().to_string(),
            });
        }

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remux to fast-start MP4 completed"
        );
        Ok(output)
    }
}
