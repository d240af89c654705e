//! Index - the API discovery resource

use serde_json::{Map, Value};

use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, JsonModel};
use crate::value_objects::{Link, Uri};

use super::model::{links_json, Model};

pub static INDEX_SCHEMA: Schema = Schema::new(
    "Index",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::Index.context_uri()),
        ),
        FieldSpec::optional("$contextVersion", FieldKind::VersionNumber),
        FieldSpec::required("$links", FieldKind::Links),
    ],
);

/// A model whose only payload is its links.
///
/// Clients fetch the index first and follow its links to every other
/// resource of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    model: Model,
}

impl Index {
    pub fn new(links: impl IntoIterator<Item = Link>) -> Self {
        Self {
            model: Model::new(ModelKind::Index.context())
                .with_context_version(ModelKind::Index.version())
                .with_links(links),
        }
    }

    /// The first link with relation `rel`.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links().iter().find(|link| link.has_rel(rel))
    }

    pub fn context() -> Uri {
        ModelKind::Index.context()
    }
}

impl HasContext for Index {
    fn envelope(&self) -> &Model {
        &self.model
    }
}

impl JsonModel for Index {
    const TYPE_NAME: &'static str = "Index";

    fn schema() -> &'static Schema {
        &INDEX_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.model.write_json(&mut map);
        // always present, even when empty
        map.insert("$links".into(), links_json(self.model.links()));
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, INDEX_SCHEMA.validate(data)?);
        Ok(Self {
            model: Model::read_json(&fields)?,
        })
    }
}

serde_via_json!(Index);
