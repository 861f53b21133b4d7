//! Account service
//!
//! Signup, login, and the session lifecycle. A session stays valid until it
//! expires, is logged out, or the user's password changes under it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::auth::{
    dummy_password_hash, generate_session_token, hash_password, hash_session_token,
    session_auth_hash, verify_password, verify_session_auth_hash,
};
use crate::domain::entities::user::{
    validate_new_password, validate_username, MSG_USERNAME_TAKEN,
};
use crate::domain::entities::{AuthContext, NewSession, NewUser, ProfileChanges, User};
use crate::domain::ports::{SessionRepository, UserRepository};
use crate::domain::validation::{FieldErrors, NON_FIELD_ERRORS};
use crate::error::{AppError, DomainError};

pub const MSG_INVALID_LOGIN: &str = "Please enter a correct username and password. Note that \
     both fields may be case-sensitive.";
pub const MSG_WRONG_OLD_PASSWORD: &str =
    "Your old password was entered incorrectly. Please enter it again.";
pub const MSG_ALREADY_AUTHENTICATED: &str = "You are already logged in.";

/// Knobs for account handling, taken from `Config`
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Key for the HMAC that ties sessions to a password hash
    pub secret_key: String,
    pub session_ttl: Duration,
    pub password_min_length: usize,
}

/// A freshly created session; the token is only available here
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Service for user accounts and sessions
pub struct AccountService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    users: Arc<UR>,
    sessions: Arc<SR>,
    settings: AccountSettings,
}

impl<UR, SR> AccountService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    pub fn new(users: Arc<UR>, sessions: Arc<SR>, settings: AccountSettings) -> Self {
        Self {
            users,
            sessions,
            settings,
        }
    }

    /// Register a user and log them in
    pub async fn signup(
        &self,
        caller: Option<&AuthContext>,
        username: Option<&str>,
        password: Option<&str>,
        password_confirmation: Option<&str>,
    ) -> Result<IssuedSession, AppError> {
        reject_authenticated(caller)?;

        let mut errors = FieldErrors::new();
        let username = validate_username(&mut errors, username);
        let password = validate_new_password(
            &mut errors,
            "password",
            "password_confirmation",
            password,
            password_confirmation,
            username.as_deref(),
            self.settings.password_min_length,
        );
        if let Some(ref name) = username {
            if self.users.find_by_username(name).await?.is_some() {
                errors.add("username", MSG_USERNAME_TAKEN);
            }
        }
        errors.into_result()?;

        let (Some(username), Some(password)) = (username, password) else {
            return Err(AppError::Internal("signup validation incomplete".to_string()));
        };

        let password_hash = hash_password(&password).map_err(hashing_failed)?;
        let user = self
            .users
            .create(&NewUser {
                username,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DomainError::AlreadyExists(_) => {
                    AppError::from(FieldErrors::single("username", MSG_USERNAME_TAKEN))
                }
                other => other.into(),
            })?;
        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

        self.issue_session(user).await
    }

    /// Check credentials and open a new session
    pub async fn login(
        &self,
        caller: Option<&AuthContext>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<IssuedSession, AppError> {
        reject_authenticated(caller)?;

        let mut errors = FieldErrors::new();
        let username = errors.require_text("username", username, None);
        let password = errors.require_secret("password", password);
        errors.into_result()?;
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AppError::Internal("login validation incomplete".to_string()));
        };

        let user = self.users.find_by_username(username).await?;
        let verified = match user {
            Some(ref user) => {
                verify_password(password, &user.password_hash).map_err(hashing_failed)?
            }
            None => {
                // Burn the same Argon2 work so response time doesn't reveal the username
                if let Some(dummy) = dummy_password_hash() {
                    let _ = verify_password(password, dummy);
                }
                false
            }
        };
        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::debug!(username = %username, "Failed login attempt");
                return Err(FieldErrors::single(NON_FIELD_ERRORS, MSG_INVALID_LOGIN).into());
            }
        };
        tracing::info!(user_id = %user.id, "User logged in");

        self.issue_session(user).await
    }

    /// Resolve a bearer token to its user and session
    ///
    /// Expired sessions and sessions whose auth hash no longer matches the
    /// user's password are deleted on sight.
    pub async fn authenticate(&self, token: &str) -> Result<Option<AuthContext>, AppError> {
        let token_hash = hash_session_token(token);
        let Some(session) = self.sessions.find_by_token_hash(&token_hash).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            self.sessions.delete(&session.id).await?;
            return Ok(None);
        }

        let Some(user) = self.users.find_by_id(&session.user_id).await? else {
            return Ok(None);
        };

        if !verify_session_auth_hash(
            &self.settings.secret_key,
            &user.password_hash,
            &session.auth_hash,
        ) {
            tracing::debug!(session_id = %session.id, user_id = %user.id, "Stale session rejected");
            self.sessions.delete(&session.id).await?;
            return Ok(None);
        }

        Ok(Some(AuthContext { user, session }))
    }

    pub async fn logout(&self, ctx: &AuthContext) -> Result<(), AppError> {
        self.sessions.delete(&ctx.session.id).await?;
        tracing::info!(user_id = %ctx.user.id, "User logged out");
        Ok(())
    }

    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        Ok(self.users.update_profile(&ctx.user.id, &changes).await?)
    }

    /// Change the caller's password, keeping only the current session valid
    pub async fn change_password(
        &self,
        ctx: &AuthContext,
        old_password: Option<&str>,
        new_password: Option<&str>,
        new_password_confirmation: Option<&str>,
    ) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        let old_password = errors.require_secret("old_password", old_password);
        if let Some(old) = old_password {
            if !verify_password(old, &ctx.user.password_hash).map_err(hashing_failed)? {
                errors.add("old_password", MSG_WRONG_OLD_PASSWORD);
            }
        }
        let new_password = validate_new_password(
            &mut errors,
            "new_password",
            "new_password_confirmation",
            new_password,
            new_password_confirmation,
            Some(ctx.user.username.as_str()),
            self.settings.password_min_length,
        );
        errors.into_result()?;
        let Some(new_password) = new_password else {
            return Err(AppError::Internal("password validation incomplete".to_string()));
        };

        let password_hash = hash_password(&new_password).map_err(hashing_failed)?;
        let user = self
            .users
            .update_password_hash(&ctx.user.id, &password_hash)
            .await?;

        // The two writes span repositories; if the session can't follow the
        // new hash, put the old one back so the caller isn't logged out
        let refreshed = async {
            let auth_hash = self.auth_hash(&user)?;
            self.sessions
                .update_auth_hash(&ctx.session.id, &auth_hash)
                .await?;
            Ok::<_, AppError>(())
        }
        .await;
        if let Err(e) = refreshed {
            tracing::error!(
                user_id = %user.id,
                error = %e,
                "Session refresh failed, restoring password"
            );
            self.users
                .update_password_hash(&ctx.user.id, &ctx.user.password_hash)
                .await?;
            return Err(e);
        }
        tracing::info!(user_id = %user.id, "Password changed");

        Ok(())
    }

    /// Delete the caller's account and every session it had
    pub async fn delete_account(&self, ctx: &AuthContext) -> Result<(), AppError> {
        let sessions = self.sessions.delete_for_user(&ctx.user.id).await?;
        if !self.users.delete(&ctx.user.id).await? {
            return Err(DomainError::NotFound(format!("User {} not found", ctx.user.id)).into());
        }
        tracing::info!(user_id = %ctx.user.id, sessions, "Account deleted");
        Ok(())
    }

    /// Remove sessions past their expiry
    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        let purged = self.sessions.delete_expired(Utc::now()).await?;
        if purged > 0 {
            tracing::info!(purged, "Expired sessions purged");
        }
        Ok(purged)
    }

    async fn issue_session(&self, mut user: User) -> Result<IssuedSession, AppError> {
        let now = Utc::now();
        let token = generate_session_token();
        let expires_at = now + self.settings.session_ttl;

        let session = self
            .sessions
            .create(&NewSession {
                user_id: user.id,
                token_hash: hash_session_token(&token),
                auth_hash: self.auth_hash(&user)?,
                expires_at,
            })
            .await?;
        self.users.update_last_login(&user.id, now).await?;
        user.last_login = Some(now);

        tracing::debug!(session_id = %session.id, user_id = %user.id, "Session issued");
        Ok(IssuedSession {
            user,
            token,
            expires_at: session.expires_at,
        })
    }

    fn auth_hash(&self, user: &User) -> Result<String, AppError> {
        session_auth_hash(&self.settings.secret_key, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Session hash failed: {}", e)))
    }
}

fn reject_authenticated(caller: Option<&AuthContext>) -> Result<(), AppError> {
    match caller {
        Some(_) => Err(FieldErrors::single(NON_FIELD_ERRORS, MSG_ALREADY_AUTHENTICATED).into()),
        None => Ok(()),
    }
}

fn hashing_failed(e: argon2::password_hash::Error) -> AppError {
    AppError::Internal(format!("Password hashing failed: {}", e))
}
