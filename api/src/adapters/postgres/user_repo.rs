//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};

use super::update_err;
use crate::domain::entities::{NewUser, ProfileChanges, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let model = users::ActiveModel {
            id: NotSet,
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            email: Set(String::new()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            date_joined: Set(Utc::now().fixed_offset()),
            last_login: Set(None),
        };

        let result = model.insert(&self.db).await.map_err(|e: DbErr| {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                DomainError::AlreadyExists(format!("User '{}' already exists", user.username))
            } else {
                DomainError::Database(e.to_string())
            }
        })?;

        Ok(result.into())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<User, DomainError> {
        let mut model = users::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };
        if let Some(ref v) = changes.first_name {
            model.first_name = Set(v.clone());
        }
        if let Some(ref v) = changes.last_name {
            model.last_name = Set(v.clone());
        }
        if let Some(ref v) = changes.email {
            model.email = Set(v.clone());
        }

        if changes.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_err(e, || format!("User {} not found", id)))?;

        Ok(result.into())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<User, DomainError> {
        let result = users::ActiveModel {
            id: Set(id.0),
            password_hash: Set(password_hash.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| update_err(e, || format!("User {} not found", id)))?;

        Ok(result.into())
    }

    async fn update_last_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), DomainError> {
        users::ActiveModel {
            id: Set(id.0),
            last_login: Set(Some(at.fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| update_err(e, || format!("User {} not found", id)))?;

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        // sessions go with it (ON DELETE CASCADE)
        let result = users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            password_hash: model.password_hash,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            date_joined: model.date_joined.with_timezone(&Utc),
            last_login: model.last_login.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
