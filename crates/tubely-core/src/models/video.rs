use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// A video record as persisted.
///
/// `video_url` and `thumbnail_url` hold stable object references (`<bucket>,<key>`),
/// never a signed URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Outward-facing video record; URL fields are signed for the current response only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

impl VideoResponse {
    /// Builds a response from a record, replacing its references with already-signed URLs.
    pub fn with_urls(
        video: Video,
        thumbnail_url: Option<String>,
        video_url: Option<String>,
    ) -> Self {
        Self {
            id: video.id,
            created_at: video.created_at,
            updated_at: video.updated_at,
            title: video.title,
            description: video.description,
            user_id: video.user_id,
            thumbnail_url,
            video_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Aspect-ratio classification of a probed video, used only as a key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectCategory {
    Landscape,
    Portrait,
    Other,
}

impl AspectCategory {
    /// Exact string match on the reported display aspect ratio. Near misses such as
    /// `"427:240"` are `Other`; there is no numeric tolerance.
    pub fn from_display_aspect_ratio(ratio: &str) -> Self {
        match ratio {
            "16:9" => AspectCategory::Landscape,
            "9:16" => AspectCategory::Portrait,
            _ => AspectCategory::Other,
        }
    }

    pub fn as_prefix(&self) -> &'static str {
        match self {
            AspectCategory::Landscape => "landscape",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Other => "other",
        }
    }
}

impl Display for AspectCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_prefix())
    }
}
