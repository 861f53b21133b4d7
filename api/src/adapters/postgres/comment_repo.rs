//! PostgreSQL adapter for CommentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::update_err;
use crate::domain::entities::{
    ArticleId, ArticleSummary, Comment, CommentId, CommentWithArticle, NewComment,
};
use crate::domain::ports::CommentRepository;
use crate::entity::{articles, comments};
use crate::error::DomainError;

/// PostgreSQL implementation of CommentRepository
pub struct PostgresCommentRepository {
    db: DatabaseConnection,
}

impl PostgresCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list(&self) -> Result<Vec<CommentWithArticle>, DomainError> {
        let results = comments::Entity::find()
            .find_also_related(articles::Entity)
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results
            .into_iter()
            .map(|(comment, article)| with_article(comment, article))
            .collect()
    }

    async fn list_by_article(&self, article_id: &ArticleId) -> Result<Vec<Comment>, DomainError> {
        let results = comments::Entity::find()
            .filter(comments::Column::ArticleId.eq(article_id.0))
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count_by_article(&self, article_id: &ArticleId) -> Result<i64, DomainError> {
        let count = comments::Entity::find()
            .filter(comments::Column::ArticleId.eq(article_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<CommentWithArticle>, DomainError> {
        let result = comments::Entity::find_by_id(id.0)
            .find_also_related(articles::Entity)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result
            .map(|(comment, article)| with_article(comment, article))
            .transpose()
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = comments::ActiveModel {
            id: NotSet,
            article_id: Set(comment.article_id.0),
            content: Set(comment.content.clone()),
            author_name: Set(comment.author_name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update_content(&self, id: &CommentId, content: &str) -> Result<Comment, DomainError> {
        let result = comments::ActiveModel {
            id: Set(id.0),
            content: Set(content.to_string()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| update_err(e, || format!("Comment {} not found", id)))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, DomainError> {
        let result = comments::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn with_article(
    comment: comments::Model,
    article: Option<articles::Model>,
) -> Result<CommentWithArticle, DomainError> {
    let article = article.ok_or_else(|| {
        DomainError::Database(format!("Comment {} has no article", comment.id))
    })?;

    Ok(CommentWithArticle {
        comment: comment.into(),
        article: ArticleSummary {
            id: ArticleId(article.id),
            title: article.title,
        },
    })
}

/// Convert SeaORM model to domain entity
impl From<comments::Model> for Comment {
    fn from(model: comments::Model) -> Self {
        Comment {
            id: CommentId(model.id),
            article_id: ArticleId(model.article_id),
            content: model.content,
            author_name: model.author_name,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
