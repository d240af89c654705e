//! Entities - models with an identity
//!
//! An entity adds `$id` and the created/updated/deleted timestamps to the
//! [`Model`](crate::models::Model) envelope. Whether an entity is deleted is
//! derived from `$deletedAt`, never stored separately.

pub mod entity;

pub use entity::{Entity, ENTITY_SCHEMA};
