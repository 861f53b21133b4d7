//! SeaORM entities
//!
//! Table mappings for the schema in `migrations/`.

pub mod articles;
pub mod artists;
pub mod comments;
pub mod sessions;
pub mod users;
