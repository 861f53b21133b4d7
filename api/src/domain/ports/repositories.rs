//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Article, ArticleChanges, ArticleId, Artist, ArtistChanges, ArtistId, Comment, CommentId,
    CommentWithArticle, NewArticle, NewArtist, NewComment, NewSession, NewUser, ProfileChanges,
    Session, SessionId, User, UserId,
};
use crate::error::DomainError;

/// Repository for Article entities
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// List articles ordered by id
    async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Article>, DomainError>;

    /// Find an article by ID
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, DomainError>;

    /// Create a new article
    async fn create(&self, article: &NewArticle) -> Result<Article, DomainError>;

    /// Apply a partial update; `NotFound` if the article doesn't exist
    async fn update(&self, id: &ArticleId, changes: &ArticleChanges)
        -> Result<Article, DomainError>;

    /// Delete an article and its comments. Returns false if it didn't exist
    async fn delete(&self, id: &ArticleId) -> Result<bool, DomainError>;
}

/// Repository for Comment entities
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// All comments with their article summary, ordered by id
    async fn list(&self) -> Result<Vec<CommentWithArticle>, DomainError>;

    /// Comments on one article, ordered by id
    async fn list_by_article(&self, article_id: &ArticleId) -> Result<Vec<Comment>, DomainError>;

    /// Number of comments on one article
    async fn count_by_article(&self, article_id: &ArticleId) -> Result<i64, DomainError>;

    /// Find a comment with its article summary
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<CommentWithArticle>, DomainError>;

    /// Create a comment
    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError>;

    /// Replace a comment's content
    async fn update_content(&self, id: &CommentId, content: &str) -> Result<Comment, DomainError>;

    /// Delete a comment. Returns false if it didn't exist
    async fn delete(&self, id: &CommentId) -> Result<bool, DomainError>;
}

/// Repository for Artist entities
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Artist>, DomainError>;

    /// Case-insensitive substring match on name
    async fn search_by_name(&self, query: &str) -> Result<Vec<Artist>, DomainError>;

    async fn find_by_id(&self, id: &ArtistId) -> Result<Option<Artist>, DomainError>;

    async fn create(&self, artist: &NewArtist) -> Result<Artist, DomainError>;

    async fn update(&self, id: &ArtistId, changes: &ArtistChanges) -> Result<Artist, DomainError>;

    async fn delete(&self, id: &ArtistId) -> Result<bool, DomainError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a user; `AlreadyExists` if the username is taken
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<User, DomainError>;

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<User, DomainError>;

    async fn update_last_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Delete a user. Returns false if it didn't exist
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;
}

/// Repository for login sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError>;

    async fn create(&self, session: &NewSession) -> Result<Session, DomainError>;

    /// Replace the auth hash a session was confirmed with
    async fn update_auth_hash(&self, id: &SessionId, auth_hash: &str) -> Result<(), DomainError>;

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;

    /// Delete every session belonging to a user
    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Delete sessions that expired at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
