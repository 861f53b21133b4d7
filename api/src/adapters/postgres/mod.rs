//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod article_repo;
pub mod artist_repo;
pub mod comment_repo;
pub mod schema;
pub mod session_repo;
pub mod user_repo;


use sea_orm::DbErr;

use crate::error::DomainError;

pub use article_repo::PostgresArticleRepository;
pub use artist_repo::PostgresArtistRepository;
pub use comment_repo::PostgresCommentRepository;
pub use schema::apply_schema;
pub use session_repo::PostgresSessionRepository;
pub use user_repo::PostgresUserRepository;

/// Map an `ActiveModel::update` error, treating "no row matched" as `NotFound`
fn update_err(e: DbErr, what: impl FnOnce() -> String) -> DomainError {
    match e {
        DbErr::RecordNotUpdated => DomainError::NotFound(what()),
        e => DomainError::Database(e.to_string()),
    }
}
