//! Bundled schema
//!
//! `migrations/0001_init.sql` only uses `IF NOT EXISTS` statements, so it is
//! safe to apply on every startup.

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::error::DomainError;

const INIT_SQL: &str = include_str!("../../../migrations/0001_init.sql");

/// Create any missing tables and indexes
pub async fn apply_schema(db: &DatabaseConnection) -> Result<(), DomainError> {
    db.execute_unprepared(INIT_SQL)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    tracing::info!("Database schema applied");
    Ok(())
}
