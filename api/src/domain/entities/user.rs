//! User account domain entity
//!
//! Also holds the signup and password rules, which only need the raw input.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::validation::FieldErrors;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const NAME_MAX_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;

pub const MSG_PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_INVALID_USERNAME: &str = "Enter a valid username. This value may contain only \
     letters, numbers, and @/./+/-/_ characters.";

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Profile fields a user may edit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ProfileChanges {
    pub fn parse(
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first_name = first_name.map(str::trim);
        let last_name = last_name.map(str::trim);
        let email = email.map(str::trim);

        if let Some(v) = first_name {
            errors.check_max_chars("first_name", v, NAME_MAX_CHARS);
        }
        if let Some(v) = last_name {
            errors.check_max_chars("last_name", v, NAME_MAX_CHARS);
        }
        if let Some(v) = email {
            errors.check_max_chars("email", v, EMAIL_MAX_CHARS);
            errors.check_email("email", v);
        }
        errors.into_result()?;

        Ok(Self {
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            email: email.map(str::to_string),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(ref v) = self.first_name {
            user.first_name = v.clone();
        }
        if let Some(ref v) = self.last_name {
            user.last_name = v.clone();
        }
        if let Some(ref v) = self.email {
            user.email = v.clone();
        }
    }
}

/// Check a username's shape (not its uniqueness)
pub fn validate_username(errors: &mut FieldErrors, username: Option<&str>) -> Option<String> {
    static USERNAME: OnceLock<Regex> = OnceLock::new();

    let username = errors.require_text("username", username, Some(USERNAME_MAX_CHARS))?;
    let pattern =
        USERNAME.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));
    if !pattern.is_match(username) {
        errors.add("username", MSG_INVALID_USERNAME);
        return None;
    }
    Some(username.to_string())
}

/// Check a new password and its confirmation
///
/// Errors are recorded under `field`. `confirmation_field` is only used when the two differ.
pub fn validate_new_password(
    errors: &mut FieldErrors,
    field: &str,
    confirmation_field: &str,
    password: Option<&str>,
    confirmation: Option<&str>,
    username: Option<&str>,
    min_length: usize,
) -> Option<String> {
    let password = errors.require_secret(field, password);
    let confirmation = errors.require_secret(confirmation_field, confirmation);
    let (password, confirmation) = (password?, confirmation?);

    if password != confirmation {
        errors.add(confirmation_field, MSG_PASSWORD_MISMATCH);
        return None;
    }

    let before = errors.get(field).map_or(0, |e| e.len());
    if password.chars().count() < min_length {
        errors.add(
            field,
            format!(
                "This password is too short. It must contain at least {} characters.",
                min_length
            ),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
    if let Some(username) = username {
        if is_too_similar(password, username) {
            errors.add(field, "The password is too similar to the username.");
        }
    }

    let after = errors.get(field).map_or(0, |e| e.len());
    (before == after).then(|| password.to_string())
}

/// Password equals the username or one contains the other (case-insensitive)
fn is_too_similar(password: &str, username: &str) -> bool {
    let password = password.to_lowercase();
    let username = username.to_lowercase();
    if username.chars().count() < 3 {
        return password == username;
    }
    password.contains(&username) || username.contains(&password)
}
