//! Entity - identity plus lifecycle timestamps

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::format_datetime;
use crate::error::ValidationError;
use crate::models::model::MODEL_SCHEMA;
use crate::models::Model;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, HasIdentity, JsonModel};
use crate::value_objects::Uri;

pub static ENTITY_SCHEMA: Schema = Schema::extending(
    &MODEL_SCHEMA,
    "Entity",
    &[
        FieldSpec::required("$id", FieldKind::Uri),
        FieldSpec::optional("$createdAt", FieldKind::Timestamp),
        FieldSpec::optional("$updatedAt", FieldKind::Timestamp),
        FieldSpec::optional("$deletedAt", FieldKind::Timestamp),
    ],
);

/// A model with an identity.
///
/// # Invariants
///
/// - `is_deleted()` is true iff `deleted_at()` is set
/// - `modified_at()` is `deleted_at ?? updated_at ?? created_at`
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rheactor_models::{Entity, HasIdentity, Model, Uri};
///
/// let created = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
/// let entity = Entity::new(
///     Model::new(Uri::new("http://example.com/jsonld/some").unwrap()),
///     Uri::new("http://example.com/some-id").unwrap(),
/// )
/// .with_created_at(created);
///
/// assert!(!entity.is_deleted());
/// assert_eq!(entity.modified_at(), Some(created));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    model: Model,
    id: Uri,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Entity {
    // =========================================================================
    // Constructor
    // =========================================================================

    pub fn new(model: Model, id: Uri) -> Self {
        Self {
            model,
            id,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn with_deleted_at(mut self, deleted_at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(deleted_at);
        self
    }

    /// Replace the envelope (e.g. to attach links).
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[inline]
    pub fn id(&self) -> &Uri {
        &self.id
    }

    #[inline]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    #[inline]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    // =========================================================================
    // Wire format
    // =========================================================================

    /// Writes the envelope, then `$id` and whichever timestamps are set.
    pub(crate) fn write_json(&self, map: &mut Map<String, Value>) {
        self.model.write_json(map);
        map.insert("$id".into(), self.id.as_str().into());
        let timestamps = [
            ("$createdAt", self.created_at),
            ("$updatedAt", self.updated_at),
            ("$deletedAt", self.deleted_at),
        ];
        for (key, at) in timestamps {
            if let Some(at) = at {
                map.insert(key.into(), format_datetime(at).into());
            }
        }
    }

    pub(crate) fn read_json(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Self {
            model: Model::read_json(fields)?,
            id: fields.uri("$id")?,
            created_at: fields.opt_timestamp("$createdAt")?,
            updated_at: fields.opt_timestamp("$updatedAt")?,
            deleted_at: fields.opt_timestamp("$deletedAt")?,
        })
    }
}

impl HasContext for Entity {
    fn envelope(&self) -> &Model {
        &self.model
    }
}

impl HasIdentity for Entity {
    fn identity(&self) -> &Entity {
        self
    }
}

impl JsonModel for Entity {
    const TYPE_NAME: &'static str = "Entity";

    fn schema() -> &'static Schema {
        &ENTITY_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.write_json(&mut map);
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let map = ENTITY_SCHEMA.validate(data)?;
        Self::read_json(&Fields::new(Self::TYPE_NAME, map))
    }
}

serde_via_json!(Entity);

// ============================================================================
// Tests
// ============================================================================
