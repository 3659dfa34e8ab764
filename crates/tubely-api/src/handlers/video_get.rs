use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video with signed URLs", body = VideoResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Stored reference could not be signed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "get_video"))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = load_owned_video(&state, &video_id, user).await?;
    Ok(Json(state.signer.sign_video(video).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos with signed URLs", body = Vec<VideoResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Stored reference could not be signed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(user.user_id).await?;
    Ok(Json(state.signer.sign_videos(videos).await?))
}
