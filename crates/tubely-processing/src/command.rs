//! External process seam.

use crate::error::ProcessingError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Component, Path};
use std::process::Stdio;
use tokio::process::Command;

const MAX_STDERR_BYTES: usize = 2048;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Tail of stderr as text, bounded so a chatty tool cannot flood logs.
    pub fn stderr_tail(&self) -> String {
        let start = self.stderr.len().saturating_sub(MAX_STDERR_BYTES);
        String::from_utf8_lossy(&self.stderr[start..]).trim().to_string()
    }

    /// Turn a non-zero exit into [`ProcessingError::ExitFailure`].
    pub fn ensure_success(self, program: &str) -> Result<Self, ProcessingError> {
        if self.success {
            Ok(self)
        } else {
            Err(ProcessingError::ExitFailure {
                program: program.to_string(),
                code: self.code,
                stderr: self.stderr_tail(),
            })
        }
    }
}

/// Runs an external program to completion and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, ProcessingError>;
}

/// Real subprocess runner on top of `tokio::process`.
///
/// Programs are spawned directly, never through a shell.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, ProcessingError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessingError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Validate a configured executable name or path.
pub(crate) fn validate_executable(path: &str) -> Result<(), ProcessingError> {
    let safe = !path.is_empty()
        && !path.contains("..")
        && path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        });
    if !safe {
        return Err(ProcessingError::InvalidPath(format!(
            "Executable path contains unsafe characters: {}",
            path
        )));
    }
    Ok(())
}

/// Media paths handed to the tools must be absolute and free of `..` components.
pub(crate) fn validate_media_path(path: &Path) -> Result<(), ProcessingError> {
    if !path.is_absolute() || path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ProcessingError::InvalidPath(path.display().to_string()));
    }
    Ok(())
}
