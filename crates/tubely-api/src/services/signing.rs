//! Read-path URL issuance: stored `<bucket>,<key>` references become signed URLs
//! for a single response.

use crate::error::HttpAppError;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::models::{ObjectReference, Video, VideoResponse};
use tubely_core::AppError;
use tubely_storage::Storage;

#[derive(Clone)]
pub struct UrlSigner {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl UrlSigner {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Parse a stored reference and sign it. A malformed reference is a server-side
    /// fault, never passed through and never blamed on the caller.
    pub async fn sign_reference(&self, stored: &str) -> Result<String, HttpAppError> {
        let reference: ObjectReference = stored.parse()?;
        self.storage
            .presigned_get_url(reference.bucket(), reference.key(), self.ttl)
            .await
            .map_err(|e| HttpAppError(AppError::Storage(e.to_string())))
    }

    async fn sign_optional(&self, stored: Option<&str>) -> Result<Option<String>, HttpAppError> {
        match stored {
            Some(stored) => Ok(Some(self.sign_reference(stored).await?)),
            None => Ok(None),
        }
    }

    /// Outward-facing view of `video`. Either every present reference is signed or the
    /// whole call fails.
    pub async fn sign_video(&self, video: Video) -> Result<VideoResponse, HttpAppError> {
        let video_url = self.sign_optional(video.video_url.as_deref()).await?;
        let thumbnail_url = self.sign_optional(video.thumbnail_url.as_deref()).await?;
        Ok(VideoResponse::with_urls(video, thumbnail_url, video_url))
    }

    pub async fn sign_videos(&self, videos: Vec<Video>) -> Result<Vec<VideoResponse>, HttpAppError> {
        let mut signed = Vec::with_capacity(videos.len());
        for video in videos {
            signed.push(self.sign_video(video).await?);
        }
        Ok(signed)
    }
}
