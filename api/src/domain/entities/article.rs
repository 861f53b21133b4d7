//! Article domain entity
//!
//! A titled piece of text with an optional image, the parent of comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::comment::Comment;
use crate::domain::validation::FieldErrors;

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum stored image path length in characters
pub const IMAGE_MAX_CHARS: usize = 255;

/// Unique identifier for an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(pub i64);

impl From<i64> for ArticleId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    /// Stored path or URL of the article image
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An article together with its comments and their count
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: Article,
    pub comments: Vec<Comment>,
    pub num_of_comments: i64,
}

/// Data needed to create a new article
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

impl NewArticle {
    /// Validate raw input and build a `NewArticle`
    pub fn parse(
        title: Option<&str>,
        content: Option<&str>,
        image: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = errors.require_text("title", title, Some(TITLE_MAX_CHARS));
        let content = errors.require_text("content", content, None);
        let image = normalize_image(&mut errors, image);
        errors.into_result()?;

        Ok(Self {
            title: title.unwrap_or_default().to_string(),
            content: content.unwrap_or_default().to_string(),
            image,
        })
    }
}

/// Partial update of an article; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the image
    pub image: Option<Option<String>>,
}

impl ArticleChanges {
    /// Validate only the fields that are present
    pub fn parse(
        title: Option<&str>,
        content: Option<&str>,
        image: Option<Option<&str>>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = title.and_then(|t| errors.require_text("title", Some(t), Some(TITLE_MAX_CHARS)));
        let content = content.and_then(|c| errors.require_text("content", Some(c), None));
        let image = image.map(|i| normalize_image(&mut errors, i));
        errors.into_result()?;

        Ok(Self {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            image,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.image.is_none()
    }

    /// Apply these changes to an article in place
    pub fn apply(&self, article: &mut Article) {
        if let Some(ref title) = self.title {
            article.title = title.clone();
        }
        if let Some(ref content) = self.content {
            article.content = content.clone();
        }
        if let Some(ref image) = self.image {
            article.image = image.clone();
        }
    }
}

/// Blank image paths count as "no image"
fn normalize_image(errors: &mut FieldErrors, image: Option<&str>) -> Option<String> {
    let image = image.map(str::trim).filter(|i| !i.is_empty())?;
    errors.check_max_chars("image", image, IMAGE_MAX_CHARS);
    Some(image.to_string())
}
