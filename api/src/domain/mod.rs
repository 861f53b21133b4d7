//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `ports`: Trait definitions for persistence
//! - `validation`: Field-level input errors

pub mod entities;
pub mod ports;
pub mod validation;
