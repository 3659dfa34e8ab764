use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tubely_core::models::{CreateVideoRequest, VideoResponse};
use tubely_core::AppError;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.user_id, operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }

    let video = state.videos.create_video(user.user_id, request).await?;
    tracing::info!(video_id = %video.id, "Video created");

    Ok((StatusCode::CREATED, Json(state.signer.sign_video(video).await?)))
}
