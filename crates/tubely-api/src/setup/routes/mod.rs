//! Route configuration and setup

mod health;

use crate::auth::{auth_middleware, AuthState};
use crate::constants::{API_PREFIX, ASSETS_PREFIX};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret().to_string(),
        jwt_issuer: config.jwt_issuer().to_string(),
    });

    let protected_routes = protected_routes(config)
        .layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware));

    let app = public_routes()
        .merge(protected_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins()
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}

/// Declared `Content-Length` above `max_bytes` is refused with 413 before the handler
/// runs; a streamed body is cut off at the same ceiling.
fn limited(route: MethodRouter<Arc<AppState>>, max_bytes: usize) -> MethodRouter<Arc<AppState>> {
    route
        .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(max_bytes))
        .layer(RequestBodyLimitLayer::new(max_bytes))
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route(
            &format!("{}/{{bucket}}/{{*key}}", ASSETS_PREFIX),
            get(handlers::local_asset::get_local_asset),
        )
}

/// Protected routes (require authentication).
fn protected_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            post(handlers::video_create::create_video).get(handlers::video_get::list_videos),
        )
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(handlers::video_get::get_video).delete(handlers::video_delete::delete_video),
        )
        .route(
            &format!("{}/video_upload/{{video_id}}", API_PREFIX),
            limited(
                post(handlers::video_upload::upload_video),
                config.max_video_upload_bytes(),
            ),
        )
        .route(
            &format!("{}/thumbnail_upload/{{video_id}}", API_PREFIX),
            limited(
                post(handlers::thumbnail_upload::upload_thumbnail),
                config.max_thumbnail_upload_bytes(),
            ),
        )
}
