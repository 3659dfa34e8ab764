//! Scripted stand-in for ffmpeg and ffprobe.

use crate::command::{CommandOutput, CommandRunner};
use crate::error::ProcessingError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Script {
    Succeed(String),
    Fail { code: i32, stderr: String },
}

/// Dispatches on the program's file name. `ffmpeg` copies the `-i` input to the last
/// argument; `ffprobe` prints canned JSON. Every invocation is recorded.
#[derive(Debug)]
pub struct ScriptedRunner {
    ffmpeg: Script,
    ffprobe: Script,
    invocations: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn with_probe_json(json: &str) -> Self {
        Self {
            ffmpeg: Script::Succeed(String::new()),
            ffprobe: Script::Succeed(json.to_string()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_aspect_ratio(ratio: &str) -> Self {
        Self::with_probe_json(&format!(
            r#"{{"streams":[{{"index":0,"codec_type":"video","width":1920,"height":1080,"display_aspect_ratio":"{}"}},{{"index":1,"codec_type":"audio"}}]}}"#,
            ratio
        ))
    }

    pub fn landscape() -> Self {
        Self::with_aspect_ratio("16:9")
    }

    pub fn portrait() -> Self {
        Self::with_aspect_ratio("9:16")
    }

    pub fn failing_remux() -> Self {
        Self {
            ffmpeg: Script::Fail {
                code: 1,
                stderr: "moov atom not found".to_string(),
            },
            ..Self::landscape()
        }
    }

    pub fn failing_probe() -> Self {
        Self {
            ffprobe: Script::Fail {
                code: 1,
                stderr: "Invalid data found when processing input".to_string(),
            },
            ..Self::landscape()
        }
    }

    /// Program names in call order.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn failure(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    async fn run_ffmpeg(&self, args: &[OsString]) -> Result<CommandOutput, ProcessingError> {
        match &self.ffmpeg {
            Script::Fail { code, stderr } => Ok(Self::failure(*code, stderr)),
            Script::Succeed(_) => {
                let input = args
                    .iter()
                    .position(|a| a == "-i")
                    .and_then(|i| args.get(i + 1))
                    .map(PathBuf::from);
                let output = args.last().map(PathBuf::from);
                let (Some(input), Some(output)) = (input, output) else {
                    return Ok(Self::failure(1, "missing input or output"));
                };
                match tokio::fs::copy(&input, &output).await {
                    Ok(_) => Ok(CommandOutput {
                        success: true,
                        code: Some(0),
                        ..Default::default()
                    }),
                    Err(e) => Ok(Self::failure(1, &e.to_string())),
                }
            }
        }
    }

    fn run_ffprobe(&self) -> CommandOutput {
        match &self.ffprobe {
            Script::Fail { code, stderr } => Self::failure(*code, stderr),
            Script::Succeed(json) => CommandOutput {
                success: true,
                code: Some(0),
                stdout: json.as_bytes().to_vec(),
                stderr: Vec::new(),
            },
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, ProcessingError> {
        let name = Path::new(program)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string());
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(name.clone());
        }

        match name.as_str() {
            "ffmpeg" => self.run_ffmpeg(args).await,
            "ffprobe" => Ok(self.run_ffprobe()),
            _ => Err(ProcessingError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            }),
        }
    }
}
