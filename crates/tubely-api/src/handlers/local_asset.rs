//! Serves objects of the local storage backend behind their signed URLs (no auth).

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tubely_core::AppError;

#[derive(Debug, Deserialize)]
pub struct SignedAssetQuery {
    pub expires: u64,
    pub signature: String,
}

#[tracing::instrument(skip(state, query), fields(operation = "get_local_asset"))]
pub async fn get_local_asset(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<SignedAssetQuery>,
) -> Result<Response, HttpAppError> {
    let local = state
        .local_assets
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;

    let object = local
        .open_signed(&bucket, &key, query.expires, &query.signature)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type.as_str())
        .header(header::CONTENT_LENGTH, object.size)
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(ReaderStream::new(object.file)))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })
}
