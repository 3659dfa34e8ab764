//! Stable identity of a stored object.
//!
//! Persisted as a single text column in the form `<bucket>,<key>`. The bucket may not
//! contain the delimiter; keys produced by this service never do either, so the split is
//! unambiguous.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::AppError;

pub const REFERENCE_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    bucket: String,
    key: String,
}

impl ObjectReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, AppError> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() || bucket.contains(REFERENCE_DELIMITER) {
            return Err(AppError::Internal(format!(
                "Invalid bucket name for object reference: {:?}",
                bucket
            )));
        }
        if key.is_empty() || key.contains(REFERENCE_DELIMITER) {
            return Err(AppError::Internal(format!(
                "Invalid key for object reference: {:?}",
                key
            )));
        }
        Ok(Self { bucket, key })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for ObjectReference {
    type Err = AppError;

    /// Fails unless the stored value splits into exactly two non-empty parts.
    fn from_str(stored: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = stored.split(REFERENCE_DELIMITER).collect();
        match parts.as_slice() {
            [bucket, key] if !bucket.is_empty() && !key.is_empty() => Ok(Self {
                bucket: (*bucket).to_string(),
                key: (*key).to_string(),
            }),
            _ => Err(AppError::Internal(format!(
                "Malformed stored object reference with {} component(s)",
                parts.len()
            ))),
        }
    }
}

impl Display for ObjectReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, REFERENCE_DELIMITER, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        let reference = ObjectReference::new("tubely-videos", "landscape/abc_-9.mp4").unwrap();
        let stored = reference.to_string();
        assert_eq!(stored, "tubely-videos,landscape/abc_-9.mp4");

        let parsed: ObjectReference = stored.parse().unwrap();
        assert_eq!(parsed.bucket(), "tubely-videos");
        assert_eq!(parsed.key(), "landscape/abc_-9.mp4");
    }

    #[test]
    fn test_wrong_component_count_is_rejected() {
        assert!("just-a-key.mp4".parse::<ObjectReference>().is_err());
        assert!("a,b,c".parse::<ObjectReference>().is_err());
        assert!(",key".parse::<ObjectReference>().is_err());
        assert!("bucket,".parse::<ObjectReference>().is_err());
        assert!("https://cdn.example.com/landscape/x.mp4"
            .parse::<ObjectReference>()
            .is_err());
    }

    #[test]
    fn test_delimiter_in_parts_is_rejected() {
        assert!(ObjectReference::new("a,b", "key").is_err());
        assert!(ObjectReference::new("bucket", "k,ey").is_err());
        assert!(ObjectReference::new("", "key").is_err());
    }
}
