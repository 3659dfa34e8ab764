use crate::auth::jwt::validate_access_token;
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match bearer_token(&request).and_then(|token| {
        validate_access_token(token, &auth_state.jwt_secret, &auth_state.jwt_issuer)
    }) {
        Ok(user_id) => user_id,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}
