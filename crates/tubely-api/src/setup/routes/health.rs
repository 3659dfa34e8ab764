//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage_backend: String,
}

/// Liveness plus a database round trip.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(CHECK_TIMEOUT, state.videos.health_check()).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            "unhealthy".to_string()
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            "timeout".to_string()
        }
    };

    let healthy = database == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let storage_backend = match state.local_assets {
        Some(_) => "local",
        None => "s3",
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            database,
            storage_backend: storage_backend.to_string(),
        }),
    )
}
