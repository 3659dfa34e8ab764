//! API path constants

/// Prefix of every JSON and upload route.
pub const API_PREFIX: &str = "/api";

/// Prefix under which the local storage backend serves signed objects.
pub const ASSETS_PREFIX: &str = "/assets";

/// Form part carrying the video bytes.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Form part carrying the thumbnail bytes.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

pub const VIDEO_MEDIA_TYPES: &[&str] = &["video/mp4"];

pub const THUMBNAIL_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png"];
