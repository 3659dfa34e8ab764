//! HTTP handlers

pub mod local_asset;
pub mod thumbnail_upload;
pub mod upload_form;
pub mod video_create;
pub mod video_delete;
pub mod video_get;
pub mod video_upload;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}

/// Fetch a record and check the caller owns it. Runs before any request body is read.
pub(crate) async fn load_owned_video(
    state: &AppState,
    raw_id: &str,
    user: AuthUser,
) -> Result<Video, HttpAppError> {
    let id = parse_video_id(raw_id)?;
    let video = state
        .videos
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user.user_id) {
        return Err(AppError::Unauthorized("Video does not belong to user".to_string()).into());
    }
    Ok(video)
}
