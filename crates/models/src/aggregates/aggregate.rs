//! Aggregate - a versioned entity
//!
//! Transitions (`updated`, `deleted`) never touch the receiver. They copy the
//! identity group, stamp the new timestamp, bump `$version` and rebuild the
//! result through [`Aggregate::new`], the same path external input takes.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::clock::{Clock, SystemClock};
use crate::entities::{Entity, ENTITY_SCHEMA};
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, HasIdentity, HasVersion, JsonModel};
use crate::models::Model;
use crate::value_objects::VersionNumber;

use super::CopyOnWrite;

pub static AGGREGATE_SCHEMA: Schema = Schema::extending(
    &ENTITY_SCHEMA,
    "Aggregate",
    &[
        FieldSpec::required("$version", FieldKind::VersionNumber),
        FieldSpec::required("$createdAt", FieldKind::Timestamp),
        FieldSpec::optional("$deleted", FieldKind::Bool),
    ],
);

/// An entity with a version counter.
///
/// # Invariants
///
/// - `created_at()` is always set
/// - every transition yields a strictly greater version
/// - a deleted aggregate stays deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    entity: Entity,
    version: VersionNumber,
}

impl Aggregate {
    /// # Errors
    ///
    /// `Aggregate.$createdAt` when the entity has no creation time.
    pub fn new(entity: Entity, version: VersionNumber) -> Result<Self, ValidationError> {
        Self::with_type_name("Aggregate", entity, version)
    }

    pub(crate) fn with_type_name(
        type_name: &'static str,
        entity: Entity,
        version: VersionNumber,
    ) -> Result<Self, ValidationError> {
        if entity.created_at().is_none() {
            return Err(ValidationError::missing(type_name, "$createdAt"));
        }
        Ok(Self { entity, version })
    }

    #[inline]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Rebuild the identity group. Entity builders only ever set fields, so
    /// `created_at` stays set.
    pub(crate) fn map_entity(mut self, f: impl FnOnce(Entity) -> Entity) -> Self {
        self.entity = f(self.entity);
        self
    }

    /// A copy with `updated_at` set to `at` (or now) and the version bumped.
    ///
    /// `new_version`, when given, must be greater than the current version.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use rheactor_models::{Aggregate, Entity, HasIdentity, HasVersion, Model, Uri, VersionNumber};
    ///
    /// let created = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
    /// let aggregate = Aggregate::new(
    ///     Entity::new(
    ///         Model::new(Uri::new("http://example.com/jsonld/some").unwrap()),
    ///         Uri::new("http://example.com/some-id").unwrap(),
    ///     )
    ///     .with_created_at(created),
    ///     VersionNumber::new(17).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// let updated = aggregate.updated(None, None).unwrap();
    /// assert_eq!(updated.version().get(), 18);
    /// assert_eq!(aggregate.version().get(), 17);
    /// assert!(updated.updated_at().is_some());
    /// ```
    pub fn updated(
        &self,
        at: Option<DateTime<Utc>>,
        new_version: Option<VersionNumber>,
    ) -> Result<Self, ValidationError> {
        self.updated_as(Self::TYPE_NAME, at, new_version)
    }

    /// A copy with `deleted_at` set to `at` (or now) and the version bumped.
    pub fn deleted(
        &self,
        at: Option<DateTime<Utc>>,
        new_version: Option<VersionNumber>,
    ) -> Result<Self, ValidationError> {
        self.deleted_as(Self::TYPE_NAME, at, new_version)
    }

    /// [`Aggregate::updated`] with errors attributed to `type_name`.
    pub(crate) fn updated_as(
        &self,
        type_name: &'static str,
        at: Option<DateTime<Utc>>,
        new_version: Option<VersionNumber>,
    ) -> Result<Self, ValidationError> {
        let at = at.unwrap_or_else(|| SystemClock.now());
        let version = next_version(type_name, self.version, new_version)?;
        tracing::trace!(id = %self.id(), from = %self.version, to = %version, "aggregate updated");
        Self::with_type_name(type_name, self.entity.clone().with_updated_at(at), version)
    }

    /// [`Aggregate::deleted`] with errors attributed to `type_name`.
    pub(crate) fn deleted_as(
        &self,
        type_name: &'static str,
        at: Option<DateTime<Utc>>,
        new_version: Option<VersionNumber>,
    ) -> Result<Self, ValidationError> {
        let at = at.unwrap_or_else(|| SystemClock.now());
        let version = next_version(type_name, self.version, new_version)?;
        tracing::trace!(id = %self.id(), from = %self.version, to = %version, "aggregate deleted");
        Self::with_type_name(type_name, self.entity.clone().with_deleted_at(at), version)
    }

    /// Writes the entity fields, then `$version`.
    pub(crate) fn write_json(&self, map: &mut Map<String, Value>) {
        self.entity.write_json(map);
        map.insert("$version".into(), self.version.get().into());
    }

    pub(crate) fn read_json(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        let entity = Entity::read_json(fields)?;
        // `$deleted` is derived; a payload may carry it but must agree
        if let Some(deleted) = fields.opt_bool("$deleted")? {
            if deleted != entity.deleted_at().is_some() {
                return Err(ValidationError::invalid(
                    fields.type_name(),
                    "$deleted",
                    format!("{} (as implied by $deletedAt)", !deleted),
                    format!("boolean {deleted}"),
                ));
            }
        }
        let version = fields.version("$version")?;
        Self::with_type_name(fields.type_name(), entity, version)
    }
}

/// The version a transition moves to.
///
/// Without an explicit request the version grows by one. A requested version
/// must be strictly greater than `current`.
pub(crate) fn next_version(
    type_name: &'static str,
    current: VersionNumber,
    requested: Option<VersionNumber>,
) -> Result<VersionNumber, ValidationError> {
    match requested {
        Some(version) if version > current => Ok(version),
        Some(version) => Err(ValidationError::invalid(
            type_name,
            "$version",
            format!("a version greater than {current}"),
            version.to_string(),
        )),
        None => current
            .next()
            .ok_or_else(|| ValidationError::version_overflow(type_name, current.get())),
    }
}

impl HasContext for Aggregate {
    fn envelope(&self) -> &Model {
        self.entity.model()
    }
}

impl HasIdentity for Aggregate {
    fn identity(&self) -> &Entity {
        &self.entity
    }
}

impl HasVersion for Aggregate {
    fn version(&self) -> VersionNumber {
        self.version
    }
}

impl JsonModel for Aggregate {
    const TYPE_NAME: &'static str = "Aggregate";

    fn schema() -> &'static Schema {
        &AGGREGATE_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.write_json(&mut map);
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let map = AGGREGATE_SCHEMA.validate(data)?;
        Self::read_json(&Fields::new(Self::TYPE_NAME, map))
    }
}

impl CopyOnWrite for Aggregate {}

serde_via_json!(Aggregate);

// ============================================================================
// Tests
// ============================================================================
