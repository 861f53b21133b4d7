//! PostgreSQL adapter for ArtistRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::update_err;
use crate::domain::entities::{Artist, ArtistChanges, ArtistId, NewArtist};
use crate::domain::ports::ArtistRepository;
use crate::entity::artists;
use crate::error::DomainError;

/// PostgreSQL implementation of ArtistRepository
pub struct PostgresArtistRepository {
    db: DatabaseConnection,
}

impl PostgresArtistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArtistRepository for PostgresArtistRepository {
    async fn list(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Artist>, DomainError> {
        let results = artists::Entity::find()
            .order_by_asc(artists::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Artist>, DomainError> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        let results = artists::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(artists::Column::Name))).like(pattern))
            .order_by_asc(artists::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: &ArtistId) -> Result<Option<Artist>, DomainError> {
        let result = artists::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, artist: &NewArtist) -> Result<Artist, DomainError> {
        let model = artists::ActiveModel {
            id: NotSet,
            name: Set(artist.name.clone()),
            agency: Set(artist.agency.clone()),
            debut_date: Set(artist.debut_date),
            is_group: Set(artist.is_group),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &ArtistId, changes: &ArtistChanges) -> Result<Artist, DomainError> {
        let result = artists::ActiveModel {
            id: Set(id.0),
            agency: Set(changes.agency.clone()),
            is_group: Set(changes.is_group),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| update_err(e, || format!("Artist {} not found", id)))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &ArtistId) -> Result<bool, DomainError> {
        let result = artists::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Escape LIKE wildcards so the query matches literally
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Convert SeaORM model to domain entity
impl From<artists::Model> for Artist {
    fn from(model: artists::Model) -> Self {
        Artist {
            id: ArtistId(model.id),
            name: model.name,
            agency: model.agency,
            debut_date: model.debut_date,
            is_group: model.is_group,
        }
    }
}
