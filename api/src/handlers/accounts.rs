//! Account handlers
//!
//! Signup, login, and profile management. Signup and login hand back a bearer
//! token; every other route here needs one.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::app::IssuedSession;
use crate::domain::entities::{AuthContext, ProfileChanges, User};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub new_password_confirmation: Option<String>,
}

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: String,
    pub last_login: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined.to_rfc3339(),
            last_login: user.last_login.map(|t| t.to_rfc3339()),
        }
    }
}

/// Returned by signup and login; the token is not shown again
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: ProfileResponse,
    pub token: String,
    pub expires_at: String,
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            user: issued.user.into(),
            token: issued.token,
            expires_at: issued.expires_at.to_rfc3339(),
        }
    }
}

fn caller(auth: &Option<Extension<AuthContext>>) -> Option<&AuthContext> {
    auth.as_ref().map(|Extension(ctx)| ctx)
}

/// POST /accounts/signup
///
/// Create an account and log it in.
pub async fn signup(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let issued = state
        .account_service
        .signup(
            caller(&auth),
            request.username.as_deref(),
            request.password.as_deref(),
            request.password_confirmation.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(issued.into())))
}

/// POST /accounts/login
pub async fn login(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let issued = state
        .account_service
        .login(
            caller(&auth),
            request.username.as_deref(),
            request.password.as_deref(),
        )
        .await?;

    Ok(Json(issued.into()))
}

/// POST /accounts/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    state.account_service.logout(&ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /accounts/me
pub async fn get_profile(Extension(ctx): Extension<AuthContext>) -> Json<ProfileResponse> {
    Json(ctx.user.into())
}

/// PUT /accounts/me
///
/// Update first name, last name, or email. Absent fields are left alone.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let changes = ProfileChanges::parse(
        request.first_name.as_deref(),
        request.last_name.as_deref(),
        request.email.as_deref(),
    )?;

    let user = state.account_service.update_profile(&ctx, changes).await?;

    Ok(Json(user.into()))
}

/// POST /accounts/password
///
/// Change the password. The calling session stays valid; all others end.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    state
        .account_service
        .change_password(
            &ctx,
            request.old_password.as_deref(),
            request.new_password.as_deref(),
            request.new_password_confirmation.as_deref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /accounts/me
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    state.account_service.delete_account(&ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}
