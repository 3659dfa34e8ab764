pub mod object_reference;
pub mod video;

pub use object_reference::ObjectReference;
pub use video::{AspectCategory, CreateVideoRequest, Video, VideoResponse};
