use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tubely_core::AppError;

/// Deletes the record only; stored objects are left in place.
#[utoipa::path(
    delete,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "delete_video"))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let video = load_owned_video(&state, &video_id, user).await?;

    if !state.videos.delete_video(video.id).await? {
        return Err(AppError::NotFound("Couldn't find video".to_string()).into());
    }

    tracing::info!(video_id = %video.id, "Video deleted");
    Ok(StatusCode::NO_CONTENT)
}
