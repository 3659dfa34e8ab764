use crate::auth::AuthUser;
use crate::constants::{THUMBNAIL_FORM_FIELD, THUMBNAIL_MEDIA_TYPES};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::handlers::upload_form::stage_form_file;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail uploaded", body = VideoResponse),
        (status = 400, description = "Invalid ID, missing part or unsupported type", body = ErrorResponse),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %user.user_id, video_id = %video_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = load_owned_video(&state, &video_id, user).await?;

    let (staged, media_type) = stage_form_file(
        &state.pipeline,
        multipart,
        THUMBNAIL_FORM_FIELD,
        THUMBNAIL_MEDIA_TYPES,
    )
    .await?;

    let video = state
        .pipeline
        .publish_thumbnail(video.id, staged, media_type)
        .await?;

    Ok(Json(state.signer.sign_video(video).await?))
}
