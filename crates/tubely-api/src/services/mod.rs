//! Service layer between handlers and the library crates.

pub mod signing;
pub mod upload;

pub use signing::UrlSigner;
pub use upload::{accepted_media_type, UploadPipeline};
