//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services validate input, coordinate the repositories, and log what changed.

pub mod account_service;
pub mod article_service;
pub mod artist_service;
pub mod comment_service;

pub use account_service::{AccountService, AccountSettings, IssuedSession};
pub use article_service::ArticleService;
pub use artist_service::ArtistService;
pub use comment_service::CommentService;
