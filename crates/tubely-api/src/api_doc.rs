//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video uploads with fast-start remuxing, aspect-ratio classification and signed playback URLs. Authenticate with `Authorization: Bearer <access token>`."
    ),
    paths(
        handlers::video_create::create_video,
        handlers::video_get::list_videos,
        handlers::video_get::get_video,
        handlers::video_delete::delete_video,
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
    ),
    components(schemas(
        models::VideoResponse,
        models::CreateVideoRequest,
        error::ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video records and uploads")
    )
)]
pub struct ApiDoc;
