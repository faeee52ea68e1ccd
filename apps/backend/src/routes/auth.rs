//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Extract the token from a `Bearer <token>` header value
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Auth middleware - extracts user token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Skip auth for register endpoint and health check
    let path = request.uri().path();
    if path == "/api/user/register" || path == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = bearer_token(auth_header)
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .to_string();

    let user = state
        .db
        .get_user_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid user token".to_string()))?;

    state.db.update_last_seen(user.id).await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        token,
    });

    Ok(next.run(request).await)
}
