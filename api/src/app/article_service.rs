//! Article service
//!
//! Article CRUD plus the detail view that bundles an article's comments.

use std::sync::Arc;

use crate::domain::entities::{Article, ArticleChanges, ArticleDetail, ArticleId, NewArticle};
use crate::domain::ports::{ArticleRepository, CommentRepository};
use crate::error::{AppError, DomainError};

/// Service for managing articles
pub struct ArticleService<AR, CR>
where
    AR: ArticleRepository + ?Sized,
    CR: CommentRepository + ?Sized,
{
    articles: Arc<AR>,
    comments: Arc<CR>,
}

impl<AR, CR> ArticleService<AR, CR>
where
    AR: ArticleRepository + ?Sized,
    CR: CommentRepository + ?Sized,
{
    pub fn new(articles: Arc<AR>, comments: Arc<CR>) -> Self {
        Self { articles, comments }
    }

    pub async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Article>, AppError> {
        Ok(self.articles.list(limit, offset).await?)
    }

    /// Get an article with its comments and comment count
    pub async fn get_detail(&self, id: &ArticleId) -> Result<ArticleDetail, AppError> {
        let article = self.require(id).await?;
        self.detail(article).await
    }

    pub async fn create(&self, new_article: NewArticle) -> Result<ArticleDetail, AppError> {
        let article = self.articles.create(&new_article).await?;
        tracing::info!(article_id = %article.id, title = %article.title, "Article created");

        Ok(ArticleDetail {
            article,
            comments: Vec::new(),
            num_of_comments: 0,
        })
    }

    /// Apply a partial update. An empty change set just returns the article.
    pub async fn update(
        &self,
        id: &ArticleId,
        changes: ArticleChanges,
    ) -> Result<ArticleDetail, AppError> {
        let article = if changes.is_empty() {
            self.require(id).await?
        } else {
            let article = self.articles.update(id, &changes).await?;
            tracing::info!(article_id = %id, "Article updated");
            article
        };
        self.detail(article).await
    }

    /// Delete an article along with its comments
    pub async fn delete(&self, id: &ArticleId) -> Result<(), AppError> {
        if !self.articles.delete(id).await? {
            return Err(not_found(id).into());
        }
        tracing::info!(article_id = %id, "Article deleted");
        Ok(())
    }

    async fn require(&self, id: &ArticleId) -> Result<Article, AppError> {
        self.articles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    async fn detail(&self, article: Article) -> Result<ArticleDetail, AppError> {
        let comments = self.comments.list_by_article(&article.id).await?;
        let num_of_comments = self.comments.count_by_article(&article.id).await?;

        Ok(ArticleDetail {
            article,
            comments,
            num_of_comments,
        })
    }
}

fn not_found(id: &ArticleId) -> DomainError {
    DomainError::NotFound(format!("Article {} not found", id))
}
