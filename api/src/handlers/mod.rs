//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod accounts;
pub mod articles;
pub mod artists;
pub mod comments;

pub use accounts::{
    change_password, delete_account, get_profile, login, logout, signup, update_profile,
};
pub use articles::{create_article, delete_article, get_article, list_articles, update_article};
pub use artists::{
    create_artist, delete_artist, get_artist, list_artists, search_artists, update_artist,
};
pub use comments::{
    create_comment, delete_article_comment, delete_comment, get_comment, list_article_comments,
    list_comments, update_comment,
};
