//! Geometry probe: ffprobe's display aspect ratio reduced to an [`AspectCategory`].

use crate::command::{validate_executable, validate_media_path, CommandRunner};
use crate::error::ProcessingError;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tubely_core::AspectCategory;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    display_aspect_ratio: Option<String>,
}

pub struct GeometryProber {
    runner: Arc<dyn CommandRunner>,
    ffprobe_path: String,
}

impl GeometryProber {
    pub fn new(ffprobe_path: String, runner: Arc<dyn CommandRunner>) -> Result<Self, ProcessingError> {
        validate_executable(&ffprobe_path)?;
        Ok(Self {
            runner,
            ffprobe_path,
        })
    }

    /// Classify the first video stream of the file at `path`.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffprobe.operation = "display_aspect_ratio"
    ))]
    pub async fn probe(&self, path: &Path) -> Result<AspectCategory, ProcessingError> {
        validate_media_path(path)?;

        let args: Vec<OsString> = vec![
            "-v".into(),
            "error".into(),
            "-print_format".into(),
            "json".into(),
            "-show_streams".into(),
            path.as_os_str().to_os_string(),
        ];
        let output = self
            .runner
            .run(&self.ffprobe_path, &args)
            .await?
            .ensure_success("ffprobe")?;

        let ratio = parse_display_aspect_ratio(&output.stdout)?;
        let category = ratio
            .as_deref()
            .map(AspectCategory::from_display_aspect_ratio)
            .unwrap_or(AspectCategory::Other);

        tracing::debug!(
            display_aspect_ratio = ?ratio,
            category = %category,
            "Probed video geometry"
        );
        Ok(category)
    }
}

/// Display aspect ratio of the first video stream, `None` when there is no video
/// stream or it carries no ratio.
fn parse_display_aspect_ratio(stdout: &[u8]) -> Result<Option<String>, ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::MalformedOutput(e.to_string()))?;

    if output.streams.is_empty() {
        return Err(ProcessingError::NoStreams);
    }

    Ok(output
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .and_then(|s| s.display_aspect_ratio))
}
