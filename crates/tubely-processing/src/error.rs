use std::io;
use thiserror::Error;

/// Failures of the external media tools and their output.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with status {code:?}: {stderr}")]
    ExitFailure {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} reported success but produced no output at {path}")]
    MissingOutput { program: String, path: String },

    #[error("Malformed probe output: {0}")]
    MalformedOutput(String),

    #[error("Probe reported no streams")]
    NoStreams,

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Failures while receiving an upload into a staged file.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to create staged file: {0}")]
    Create(#[source] io::Error),

    #[error("Failed to write staged file: {0}")]
    Write(#[source] io::Error),

    /// The inbound stream failed (truncated body, size limit hit, ...).
    #[error("Upload stream failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
