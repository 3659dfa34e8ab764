//! Object key derivation and validation.

use crate::{StorageError, StorageResult};
use base64::Engine;
use rand::Rng;

/// Random bytes per key before encoding.
pub const RANDOM_KEY_BYTES: usize = 32;

/// 32 bytes from the thread-local CSPRNG, base64url without padding (43 chars).
pub fn random_key_component() -> String {
    let mut bytes = [0u8; RANDOM_KEY_BYTES];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Subtype portion of a media type (`video/mp4` -> `mp4`), parameters ignored.
pub fn extension_for_media_type(media_type: &str) -> StorageResult<&str> {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    let subtype = essence
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .ok_or_else(|| StorageError::InvalidKey(format!("Invalid media type: {}", media_type)))?;

    let valid = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+'));
    if !valid {
        return Err(StorageError::InvalidKey(format!(
            "Invalid media subtype: {}",
            media_type
        )));
    }

    Ok(subtype)
}

/// `{prefix}/{random}.{subtype}`, or `{random}.{subtype}` without a prefix.
pub fn derive_object_key(prefix: Option<&str>, media_type: &str) -> StorageResult<String> {
    let extension = extension_for_media_type(media_type)?;
    let random = random_key_component();
    let key = match prefix {
        Some(prefix) => format!("{}/{}.{}", prefix, random, extension),
        None => format!("{}.{}", random, extension),
    };
    validate_key(&key)?;
    Ok(key)
}

/// Reject keys that could escape a base directory or break reference parsing.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Key is empty".to_string()));
    }
    if key.starts_with('/') || key.contains("..") || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Key must be relative without traversal: {}",
            key
        )));
    }
    if key.contains(',') {
        return Err(StorageError::InvalidKey(format!(
            "Key must not contain ',': {}",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_url_safe(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    #[test]
    fn test_video_key_layout() {
        let key = derive_object_key(Some("landscape"), "video/mp4").unwrap();
        let rest = key.strip_prefix("landscape/").unwrap();
        let random = rest.strip_suffix(".mp4").unwrap();
        assert_eq!(random.len(), 43);
        assert!(is_url_safe(random));
        assert!(!random.contains('='));
    }

    #[test]
    fn test_thumbnail_key_has_no_prefix() {
        let key = derive_object_key(None, "image/png").unwrap();
        assert!(!key.contains('/'));
        assert!(key.ends_with(".png"));
        assert_eq!(key.len(), 43 + ".png".len());
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<String> = (0..10_000)
            .map(|_| derive_object_key(Some("other"), "video/mp4").unwrap())
            .collect();
        assert_eq!(keys.len(), 10_000);
    }

    #[test]
    fn test_extension_from_media_type() {
        assert_eq!(extension_for_media_type("video/mp4").unwrap(), "mp4");
        assert_eq!(
            extension_for_media_type("image/jpeg; charset=binary").unwrap(),
            "jpeg"
        );
        assert!(extension_for_media_type("mp4").is_err());
        assert!(extension_for_media_type("video/").is_err());
        assert!(extension_for_media_type("video/../../etc").is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("portrait/abc.mp4").is_ok());
        assert!(validate_key("/abs.mp4").is_err());
        assert!(validate_key("a/../b.mp4").is_err());
        assert!(validate_key("a,b.mp4").is_err());
        assert!(validate_key("").is_err());
    }
}
