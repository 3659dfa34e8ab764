use crate::error::HttpAppError;
use crate::services::{accepted_media_type, UploadPipeline};
use axum::extract::Multipart;
use tubely_core::AppError;
use tubely_processing::StagedFile;

/// Stage the form part named `field_name`.
///
/// The part's declared media type is checked before a single byte is staged; other
/// parts are skipped.
pub async fn stage_form_file(
    pipeline: &UploadPipeline,
    mut multipart: Multipart,
    field_name: &str,
    allowed: &[&'static str],
) -> Result<(StagedFile, &'static str), HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let media_type = accepted_media_type(field.content_type(), allowed).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid file type, allowed: {}",
                allowed.join(", ")
            ))
        })?;

        let staged = pipeline.stage(Box::pin(field), media_type).await?;
        tracing::debug!(
            field = field_name,
            media_type = media_type,
            size_bytes = staged.size_bytes(),
            "Form file staged"
        );
        return Ok((staged, media_type));
    }

    Err(AppError::InvalidInput(format!("Missing form part '{}'", field_name)).into())
}
