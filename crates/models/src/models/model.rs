//! Model - the envelope every resource carries
//!
//! `$context` names the schema of the resource, `$contextVersion` its
//! generation, `$links` the navigation attached to it. Higher levels
//! ([`Entity`](crate::entities::Entity), [`Aggregate`](crate::aggregates::Aggregate),
//! ...) embed a `Model` and write its fields before their own.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, JsonModel};
use crate::value_objects::{Link, Uri, VersionNumber};

pub static MODEL_SCHEMA: Schema = Schema::new(
    "Model",
    &[
        FieldSpec::required("$context", FieldKind::Uri),
        FieldSpec::optional("$contextVersion", FieldKind::VersionNumber),
        FieldSpec::optional("$links", FieldKind::Links),
    ],
);

/// The envelope shared by all resources.
///
/// # Example
///
/// ```
/// use rheactor_models::{JsonModel, Model, Uri};
///
/// let model = Model::new(Uri::new("http://example.com/jsonld/some").unwrap());
/// assert_eq!(model.context_version().get(), 1);
/// assert_eq!(Model::from_json(&model.to_json()).unwrap(), model);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    context: Uri,
    context_version: VersionNumber,
    links: Vec<Link>,
}

impl Model {
    /// A model with schema version 1 and no links.
    pub fn new(context: Uri) -> Self {
        Self {
            context,
            context_version: VersionNumber::INITIAL,
            links: Vec::new(),
        }
    }

    pub fn with_context_version(mut self, context_version: VersionNumber) -> Self {
        self.context_version = context_version;
        self
    }

    /// Replace the links. The model owns its own copy of them.
    pub fn with_links(mut self, links: impl IntoIterator<Item = Link>) -> Self {
        self.links = links.into_iter().collect();
        self
    }

    /// Append one link.
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    #[inline]
    pub fn context(&self) -> &Uri {
        &self.context
    }

    #[inline]
    pub fn context_version(&self) -> VersionNumber {
        self.context_version
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Writes the envelope; `$links` only when there are any.
    pub(crate) fn write_json(&self, map: &mut Map<String, Value>) {
        map.insert("$context".into(), self.context.as_str().into());
        map.insert("$contextVersion".into(), self.context_version.get().into());
        if !self.links.is_empty() {
            map.insert("$links".into(), links_json(&self.links));
        }
    }

    pub(crate) fn read_json(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Self {
            context: fields.uri("$context")?,
            context_version: fields
                .opt_version("$contextVersion")?
                .unwrap_or(VersionNumber::INITIAL),
            links: fields.links("$links")?,
        })
    }
}

/// Links as a JSON array.
pub(crate) fn links_json(links: &[Link]) -> Value {
    Value::Array(links.iter().map(JsonModel::to_json).collect())
}

impl HasContext for Model {
    fn envelope(&self) -> &Model {
        self
    }
}

impl JsonModel for Model {
    const TYPE_NAME: &'static str = "Model";

    fn schema() -> &'static Schema {
        &MODEL_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.write_json(&mut map);
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let map = MODEL_SCHEMA.validate(data)?;
        Self::read_json(&Fields::new(Self::TYPE_NAME, map))
    }
}

serde_via_json!(Model);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Uri {
        Uri::new("http://example.com/jsonld/some").unwrap()
    }

    fn link() -> Link {
        Link::new(
            Uri::new("http://example.com/some-item/42").unwrap(),
            Uri::new("http://example.com/jsonld/some").unwrap(),
        )
        .as_list()
        .with_rel("next")
    }

    mod constructor {
        use super::*;

        #[test]
        fn defaults() {
            let model = Model::new(context());
            assert_eq!(model.context(), &context());
            assert_eq!(model.context_version(), VersionNumber::INITIAL);
            assert!(model.links().is_empty());
        }

        #[test]
        fn links_are_owned_copies() {
            let mut links = vec![link()];
            let model = Model::new(context()).with_links(links.clone());
            links.push(link().with_rel("prev"));
            links.clear();
            assert_eq!(model.links(), &[link()]);
        }
    }

    mod serde {
        use super::*;
        use crate::context::ModelKind;

        #[test]
        fn omits_empty_links() {
            let json = Model::new(context()).to_json();
            assert_eq!(
                json,
                json!({"$context": "http://example.com/jsonld/some", "$contextVersion": 1})
            );
        }

        #[test]
        fn missing_context_version_means_one() {
            let data = json!({"$context": "http://example.com/jsonld/some"});
            let model = Model::from_json(&data).unwrap();
            assert_eq!(model.context_version().get(), 1);
        }

        #[test]
        fn roundtrip_with_links_and_version() {
            let model = Model::new(context())
                .with_context_version(VersionNumber::new(3).unwrap())
                .with_link(link());
            assert_eq!(Model::from_json(&model.to_json()).unwrap(), model);
        }

        #[test]
        fn ignores_unknown_keys() {
            let data = json!({
                "$context": "http://example.com/jsonld/some",
                "amount": 1,
                "message": "Test"
            });
            assert_eq!(Model::from_json(&data).unwrap(), Model::new(context()));
        }

        #[test]
        fn rejects_invalid_nested_link() {
            let bad = json!({"$context": ModelKind::Link.context_uri(), "subject": "x"});
            let data = json!({
                "$context": "http://example.com/jsonld/some",
                "$links": [link().to_json(), bad]
            });
            let err = Model::from_json(&data).unwrap_err();
            assert_eq!(err.type_name(), "Model");
            assert_eq!(err.path(), "$links[1].subject");
        }

        #[test]
        fn is_requires_context() {
            assert!(Model::is(&json!({"$context": "http://example.com/a"})));
            assert!(!Model::is(&json!({"$links": []})));
            assert!(!Model::is(&json!("http://example.com/a")));
        }
    }
}
