//! Upload pipeline: stage, then remux, probe, key, transfer and persist.

mod media_type;
mod pipeline;

pub use media_type::accepted_media_type;
pub use pipeline::UploadPipeline;
