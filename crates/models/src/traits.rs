//! Capabilities shared by the model types
//!
//! Instead of a class hierarchy, each concrete type embeds the field groups it
//! needs ([`Model`], [`Entity`], [`Aggregate`]) and exposes them through these
//! traits:
//!
//! | Trait | Field group | Provides |
//! |-------|-------------|----------|
//! | [`HasContext`] | `Model` | `$context`, `$contextVersion`, `$links` |
//! | [`HasIdentity`] | `Entity` | `$id`, timestamps, `deleted`, `modified_at` |
//! | [`HasVersion`] | `Aggregate` | `$version` |
//!
//! [`Model`]: crate::models::Model
//! [`Entity`]: crate::entities::Entity
//! [`Aggregate`]: crate::aggregates::Aggregate

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entities::Entity;
use crate::error::ValidationError;
use crate::models::Model;
use crate::schema::Schema;
use crate::value_objects::{Link, Uri, VersionNumber};

/// A type with a canonical JSON representation.
pub trait JsonModel: Sized {
    /// Name used to attribute validation errors.
    const TYPE_NAME: &'static str;

    /// The schema `from_json` validates against.
    fn schema() -> &'static Schema;

    /// The canonical wire form.
    fn to_json(&self) -> Value;

    /// Validates `data` against [`JsonModel::schema`], then builds the value.
    ///
    /// # Errors
    ///
    /// The first field that does not match, before anything is constructed.
    fn from_json(data: &Value) -> Result<Self, ValidationError>;

    /// Whether `data` is a valid payload for this type.
    fn is(data: &Value) -> bool {
        Self::schema().matches(data)
    }
}

/// Access to the `Model` envelope.
pub trait HasContext {
    fn envelope(&self) -> &Model;

    fn context(&self) -> &Uri {
        self.envelope().context()
    }

    fn context_version(&self) -> VersionNumber {
        self.envelope().context_version()
    }

    fn links(&self) -> &[Link] {
        self.envelope().links()
    }
}

/// Access to the `Entity` identity group.
pub trait HasIdentity: HasContext {
    fn identity(&self) -> &Entity;

    fn id(&self) -> &Uri {
        self.identity().id()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.identity().created_at()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.identity().updated_at()
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.identity().deleted_at()
    }

    /// True iff `deleted_at` is set.
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// The latest of `deleted_at`, `updated_at`, `created_at`, in that order.
    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at()
            .or_else(|| self.updated_at())
            .or_else(|| self.created_at())
    }
}

/// Access to an aggregate's version counter.
pub trait HasVersion: HasIdentity {
    fn version(&self) -> VersionNumber;
}
