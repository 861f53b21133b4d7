//! PostgreSQL adapter for ArticleRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder,
    QuerySelect, Set,
};

use super::update_err;
use crate::domain::entities::{Article, ArticleChanges, ArticleId, NewArticle};
use crate::domain::ports::ArticleRepository;
use crate::entity::articles;
use crate::error::DomainError;

/// PostgreSQL implementation of ArticleRepository
pub struct PostgresArticleRepository {
    db: DatabaseConnection,
}

impl PostgresArticleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Article>, DomainError> {
        let results = articles::Entity::find()
            .order_by_asc(articles::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, DomainError> {
        let result = articles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, article: &NewArticle) -> Result<Article, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = articles::ActiveModel {
            id: NotSet,
            title: Set(article.title.clone()),
            content: Set(article.content.clone()),
            image: Set(article.image.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &ArticleId,
        changes: &ArticleChanges,
    ) -> Result<Article, DomainError> {
        let mut model = articles::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        if let Some(ref title) = changes.title {
            model.title = Set(title.clone());
        }
        if let Some(ref content) = changes.content {
            model.content = Set(content.clone());
        }
        if let Some(ref image) = changes.image {
            model.image = Set(image.clone());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_err(e, || format!("Article {} not found", id)))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, DomainError> {
        // comments go with it (ON DELETE CASCADE)
        let result = articles::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<articles::Model> for Article {
    fn from(model: articles::Model) -> Self {
        Article {
            id: ArticleId(model.id),
            title: model.title,
            content: model.content,
            image: model.image,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
