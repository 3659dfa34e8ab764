//! Tubely media processing
//!
//! Request-scoped staging of uploads and the two external tools the upload pipeline
//! drives: an ffmpeg remux to fast-start MP4 and an ffprobe geometry probe. Both tools
//! run through the [`CommandRunner`] seam so the pipeline can be exercised without the
//! real binaries.

pub mod command;
pub mod error;
pub mod probe;
pub mod remux;
pub mod staging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use error::{ProcessingError, StagingError};
pub use probe::GeometryProber;
pub use remux::Remuxer;
pub use staging::{StagedFile, StagingArea};
