use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use chrono::Utc;
use tubely_core::models::Video;
use uuid::Uuid;

/// Stand-in MP4 bytes; the scripted ffmpeg copies them unchanged.
pub const SAMPLE_MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isomfake-mdat-then-moov";

pub const SAMPLE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";

pub fn video_record(user_id: Uuid) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        title: "Boots on the ground".to_string(),
        description: "Sample upload".to_string(),
        user_id,
        thumbnail_url: None,
        video_url: None,
    }
}

pub fn file_form(field: &str, file_name: &str, mime_type: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(Bytes::copy_from_slice(bytes))
            .file_name(file_name)
            .mime_type(mime_type),
    )
}

pub fn video_form(bytes: &[u8]) -> MultipartForm {
    file_form("video", "clip.mp4", "video/mp4", bytes)
}

/// True for 32 random bytes in URL-safe base64 without padding.
pub fn is_random_component(text: &str) -> bool {
    text.len() == 43
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split a stored `<bucket>,<key>` reference.
pub fn split_reference(reference: &str) -> (&str, &str) {
    reference
        .split_once(',')
        .expect("Reference should contain a delimiter")
}
