//! Database repositories
//
// Video records (metadata plus stored object references)
pub mod video;

pub use video::{VideoRepository, VideoStore};
