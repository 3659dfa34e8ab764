//! Service error taxonomy
//!
//! Every failure the service reports is an [`AppError`]. A variant decides its own HTTP
//! presentation through [`ErrorMetadata`]; the API layer only renders it.
//!
//! `Database` carries the `sqlx::Error` when the `sqlx` feature is on and a message otherwise.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Level an error is logged at when it reaches the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Client mistakes: bad input, auth
    Debug,
    /// Media the tools refused
    Warn,
    /// Storage, database and internal faults
    Error,
}

/// How an error presents itself to clients and logs.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine code, e.g. `STORAGE_ERROR`.
    fn error_code(&self) -> &'static str;

    /// Retrying the same request may succeed.
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show a client.
    fn client_message(&self) -> String;

    /// Internal details (paths, tool output, credentials) must not reach the client.
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Media processing error: {0}")]
    MediaProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Fixed presentation of one error kind.
struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const RETRY_LATER: Option<&str> = Some("Retry after a short delay");

impl AppError {
    fn presentation(&self) -> Presentation {
        let (status, code, recoverable, action, sensitive, level) = match self {
            AppError::Database(_) => (500, "DATABASE_ERROR", true, RETRY_LATER, true, LogLevel::Error),
            AppError::Storage(_) => (500, "STORAGE_ERROR", true, RETRY_LATER, true, LogLevel::Error),
            AppError::MediaProcessing(_) => (
                500,
                "MEDIA_PROCESSING_ERROR",
                false,
                Some("Check that the file is a valid MP4 and try again"),
                true,
                LogLevel::Warn,
            ),
            AppError::InvalidInput(_) => (
                400,
                "INVALID_INPUT",
                false,
                Some("Check request parameters and try again"),
                false,
                LogLevel::Debug,
            ),
            AppError::NotFound(_) => (
                404,
                "NOT_FOUND",
                false,
                Some("Verify the resource ID exists"),
                false,
                LogLevel::Debug,
            ),
            AppError::PayloadTooLarge(_) => (
                413,
                "PAYLOAD_TOO_LARGE",
                false,
                Some("Reduce file size"),
                false,
                LogLevel::Debug,
            ),
            AppError::Unauthorized(_) => (
                401,
                "UNAUTHORIZED",
                false,
                Some("Check the bearer token"),
                false,
                LogLevel::Debug,
            ),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                (500, "INTERNAL_ERROR", true, RETRY_LATER, true, LogLevel::Error)
            }
        };
        Presentation {
            status,
            code,
            recoverable,
            action,
            sensitive,
            level,
        }
    }

    /// Variant name, shown alongside `details` outside production.
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::MediaProcessing(_) => "MediaProcessing",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five `Caused by:` lines.
    pub fn detailed_message(&self) -> String {
        const MAX_DEPTH: usize = 5;

        let mut details = self.to_string();
        let mut chain = std::iter::successors(std::error::Error::source(self), |err| err.source());
        for cause in chain.by_ref().take(MAX_DEPTH) {
            details.push_str(&format!("\n  Caused by: {}", cause));
        }
        if chain.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::MediaProcessing(_) => "Failed to process media file".to_string(),
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
