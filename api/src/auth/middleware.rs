//! Session authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::error::AppError;
use crate::AppState;

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Resolves the bearer token to a live session and injects the `AuthContext`
/// into request extensions. Rejects the request with 401 otherwise.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let context = state
        .account_service
        .authenticate(token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Optional authentication middleware
///
/// Like auth_middleware but never rejects. The `AuthContext` is simply absent
/// from extensions when the caller isn't logged in.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer_token(&request) {
        match state.account_service.authenticate(token).await {
            Ok(Some(context)) => {
                request.extensions_mut().insert(context);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Session lookup failed"),
        }
    }

    next.run(request).await
}
