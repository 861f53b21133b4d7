//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Ids come from one shared counter so fixtures never collide.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, NaiveDate, Utc};

use crate::app::AccountSettings;
use crate::config::Config;
use crate::domain::entities::{
    Article, ArticleId, Artist, ArtistId, AuthContext, Comment, CommentId, Session, SessionId,
    User, UserId,
};

static NEXT_ID: AtomicI64 = AtomicI64::new(1000);

fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::SeqCst)
}

/// Create a test article with default values
pub fn test_article() -> Article {
    test_article_titled("Test article")
}

/// Create a test article with a specific title
pub fn test_article_titled(title: &str) -> Article {
    let now = Utc::now();
    Article {
        id: ArticleId(next_id()),
        title: title.to_string(),
        content: format!("Content of {}", title),
        image: Some("images/test.png".to_string()),
        created_at: now,
        updated_at: now,
    }
}

/// Create an anonymous comment on an article
pub fn test_comment(article_id: ArticleId, content: &str) -> Comment {
    let now = Utc::now();
    Comment {
        id: CommentId(next_id()),
        article_id,
        content: content.to_string(),
        author_name: "anonymous".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Create a solo artist debuting on 2008-09-18
pub fn test_artist(name: &str) -> Artist {
    Artist {
        id: ArtistId(next_id()),
        name: name.to_string(),
        agency: "Test Agency".to_string(),
        debut_date: NaiveDate::from_ymd_opt(2008, 9, 18).unwrap(),
        is_group: false,
    }
}

/// Create a test user; the password hash is a placeholder, not a real PHC string
pub fn test_user(username: &str) -> User {
    User {
        id: UserId(next_id()),
        username: username.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        date_joined: Utc::now(),
        last_login: None,
    }
}

/// An auth context for a user who isn't stored anywhere
pub fn test_auth_context(username: &str) -> AuthContext {
    let user = test_user(username);
    let now = Utc::now();
    let session = Session {
        id: SessionId::new(),
        user_id: user.id,
        token_hash: "token-hash".to_string(),
        auth_hash: "auth-hash".to_string(),
        created_at: now,
        expires_at: now + Duration::hours(1),
    };
    AuthContext { user, session }
}

pub fn test_account_settings() -> AccountSettings {
    AccountSettings {
        secret_key: "test-secret-key".to_string(),
        session_ttl: Duration::hours(1),
        password_min_length: 8,
    }
}

/// Config for router tests; the rate limiter is off so tests can't trip it
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        port: 0,
        secret_key: "test-secret-key".to_string(),
        session_ttl_seconds: 3600,
        password_min_length: 8,
        auth_rate_limit_replenish_seconds: 0,
        auth_rate_limit_burst: 5,
        apply_schema: false,
    }
}
