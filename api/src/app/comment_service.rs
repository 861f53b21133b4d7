//! Comment service
//!
//! Comments always hang off an existing article.

use std::sync::Arc;

use crate::domain::entities::{
    comment, ArticleId, ArticleSummary, AuthContext, CommentId, CommentWithArticle, NewComment,
};
use crate::domain::ports::{ArticleRepository, CommentRepository};
use crate::error::{AppError, DomainError};

/// Service for managing comments
pub struct CommentService<AR, CR>
where
    AR: ArticleRepository + ?Sized,
    CR: CommentRepository + ?Sized,
{
    articles: Arc<AR>,
    comments: Arc<CR>,
}

impl<AR, CR> CommentService<AR, CR>
where
    AR: ArticleRepository + ?Sized,
    CR: CommentRepository + ?Sized,
{
    pub fn new(articles: Arc<AR>, comments: Arc<CR>) -> Self {
        Self { articles, comments }
    }

    pub async fn list(&self) -> Result<Vec<CommentWithArticle>, AppError> {
        Ok(self.comments.list().await?)
    }

    /// Comments on one article; `NotFound` if the article doesn't exist
    pub async fn list_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<CommentWithArticle>, AppError> {
        let article = self.require_article(article_id).await?;
        let comments = self.comments.list_by_article(article_id).await?;

        Ok(comments
            .into_iter()
            .map(|comment| CommentWithArticle {
                comment,
                article: article.clone(),
            })
            .collect())
    }

    pub async fn get(&self, id: &CommentId) -> Result<CommentWithArticle, AppError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    /// Comment on an article as the caller, or anonymously
    pub async fn create(
        &self,
        article_id: &ArticleId,
        content: Option<&str>,
        author: Option<&AuthContext>,
    ) -> Result<CommentWithArticle, AppError> {
        let article = self.require_article(article_id).await?;
        let author_name = author.map(|ctx| ctx.user.username.as_str());
        let new_comment = NewComment::parse(*article_id, content, author_name)?;

        let comment = self.comments.create(&new_comment).await?;
        tracing::info!(
            comment_id = %comment.id,
            article_id = %article_id,
            author = %comment.author_name,
            "Comment created"
        );

        Ok(CommentWithArticle { comment, article })
    }

    /// Replace a comment's content
    pub async fn update(
        &self,
        id: &CommentId,
        content: Option<&str>,
    ) -> Result<CommentWithArticle, AppError> {
        let content = comment::parse_content(content)?;
        let existing = self.get(id).await?;

        let comment = self.comments.update_content(id, &content).await?;
        tracing::info!(comment_id = %id, "Comment updated");

        Ok(CommentWithArticle {
            comment,
            article: existing.article,
        })
    }

    pub async fn delete(&self, id: &CommentId) -> Result<(), AppError> {
        if !self.comments.delete(id).await? {
            return Err(not_found(id).into());
        }
        tracing::info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    /// Delete a comment addressed through its article
    ///
    /// A comment that belongs to another article is reported as missing.
    pub async fn delete_for_article(
        &self,
        article_id: &ArticleId,
        id: &CommentId,
    ) -> Result<(), AppError> {
        let existing = self.get(id).await?;
        if existing.comment.article_id != *article_id {
            return Err(not_found(id).into());
        }
        self.delete(id).await
    }

    async fn require_article(&self, id: &ArticleId) -> Result<ArticleSummary, AppError> {
        let article = self
            .articles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Article {} not found", id)))?;

        Ok(ArticleSummary {
            id: article.id,
            title: article.title,
        })
    }
}

fn not_found(id: &CommentId) -> DomainError {
    DomainError::NotFound(format!("Comment {} not found", id))
}
