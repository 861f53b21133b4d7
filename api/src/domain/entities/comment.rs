//! Comment domain entity
//!
//! A short note attached to an article.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::article::ArticleId;
use crate::domain::validation::FieldErrors;

pub const CONTENT_MAX_CHARS: usize = 200;
pub const AUTHOR_NAME_MAX_CHARS: usize = 100;

/// Author recorded for comments left without logging in
pub const ANONYMOUS_AUTHOR: &str = "anonymous";

/// Unique identifier for a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub i64);

impl From<i64> for CommentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The id and title of the article a comment belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
}

/// A comment with its parent article's summary
#[derive(Debug, Clone)]
pub struct CommentWithArticle {
    pub comment: Comment,
    pub article: ArticleSummary,
}

/// Data needed to create a new comment
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub article_id: ArticleId,
    pub content: String,
    pub author_name: String,
}

/// Validate comment content
pub fn parse_content(content: Option<&str>) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let content = errors.require_text("content", content, Some(CONTENT_MAX_CHARS));
    errors.into_result()?;
    Ok(content.unwrap_or_default().to_string())
}

impl NewComment {
    /// Validate raw input; the author falls back to `ANONYMOUS_AUTHOR`
    pub fn parse(
        article_id: ArticleId,
        content: Option<&str>,
        author_name: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let content = parse_content(content)?;
        let author_name = author_name
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);

        let mut errors = FieldErrors::new();
        errors.check_max_chars("author_name", author_name, AUTHOR_NAME_MAX_CHARS);
        errors.into_result()?;

        Ok(Self {
            article_id,
            content,
            author_name: author_name.to_string(),
        })
    }
}
