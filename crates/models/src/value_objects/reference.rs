//! Pointers to entities

use serde_json::{Map, Value};

use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasIdentity, JsonModel};
use crate::value_objects::Uri;

static REFERENCE_SCHEMA: Schema = Schema::new(
    "Reference",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::Reference.context_uri()),
        ),
        FieldSpec::optional("$contextVersion", FieldKind::VersionNumber),
        FieldSpec::required("subject", FieldKind::Uri),
        FieldSpec::required("$id", FieldKind::Uri),
    ],
);

/// A lightweight pointer to an entity: its id and its context.
///
/// The id doubles as the URL to retrieve the referenced item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    id: Uri,
    subject: Uri,
}

impl Reference {
    pub fn new(id: Uri, subject: Uri) -> Self {
        Self { id, subject }
    }

    /// Points at `entity`, using its context as the subject.
    pub fn from_entity<E: HasIdentity + ?Sized>(entity: &E) -> Self {
        Self::new(entity.id().clone(), entity.context().clone())
    }

    #[inline]
    pub fn id(&self) -> &Uri {
        &self.id
    }

    #[inline]
    pub fn subject(&self) -> &Uri {
        &self.subject
    }

    pub fn context() -> Uri {
        ModelKind::Reference.context()
    }
}

impl JsonModel for Reference {
    const TYPE_NAME: &'static str = "Reference";

    fn schema() -> &'static Schema {
        &REFERENCE_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("$context".into(), ModelKind::Reference.context_uri().into());
        map.insert(
            "$contextVersion".into(),
            ModelKind::Reference.schema_version().into(),
        );
        map.insert("subject".into(), self.subject.as_str().into());
        map.insert("$id".into(), self.id.as_str().into());
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, REFERENCE_SCHEMA.validate(data)?);
        Ok(Self::new(fields.uri("$id")?, fields.uri("subject")?))
    }
}

serde_via_json!(Reference);
