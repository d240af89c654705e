//! Typed hyperlinks

use serde_json::{Map, Value};

use crate::common::some_if_not_empty;
use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::JsonModel;
use crate::value_objects::{Uri, VersionNumber};

pub static LINK_SCHEMA: Schema = Schema::new(
    "Link",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::Link.context_uri()),
        ),
        FieldSpec::optional("$contextVersion", FieldKind::VersionNumber),
        FieldSpec::required("subject", FieldKind::Uri),
        FieldSpec::required("href", FieldKind::Uri),
        FieldSpec::optional("list", FieldKind::Bool),
        FieldSpec::optional("rel", FieldKind::String),
    ],
);

/// A link from a resource to another resource or collection.
///
/// `subject` is the context URI of the linked item, `href` is where to fetch
/// it. A link marked as list points at a [`List`](crate::models::List) of
/// `subject` items.
///
/// # Example
///
/// ```
/// use rheactor_models::{JsonModel, Link, Uri};
///
/// let link = Link::new(
///     Uri::new("http://example.com/some-item/42").unwrap(),
///     Uri::new("http://example.com/jsonld/some").unwrap(),
/// )
/// .as_list()
/// .with_rel("next");
///
/// let json = link.to_json();
/// assert_eq!(json["list"], true);
/// assert_eq!(json["rel"], "next");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    href: Uri,
    subject: Uri,
    is_list: bool,
    rel: Option<String>,
}

impl Link {
    pub fn new(href: Uri, subject: Uri) -> Self {
        Self {
            href,
            subject,
            is_list: false,
            rel: None,
        }
    }

    /// Mark the link as pointing at a list.
    pub fn as_list(self) -> Self {
        self.with_list(true)
    }

    pub fn with_list(mut self, is_list: bool) -> Self {
        self.is_list = is_list;
        self
    }

    /// Set the relation label. An empty label leaves the relation unset.
    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = some_if_not_empty(rel.into());
        self
    }

    #[inline]
    pub fn href(&self) -> &Uri {
        &self.href
    }

    #[inline]
    pub fn subject(&self) -> &Uri {
        &self.subject
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        self.is_list
    }

    #[inline]
    pub fn rel(&self) -> Option<&str> {
        self.rel.as_deref()
    }

    /// Whether the relation label equals `rel`.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel() == Some(rel)
    }

    /// The fixed context of every link.
    pub fn context() -> Uri {
        ModelKind::Link.context()
    }

    pub fn context_version() -> VersionNumber {
        ModelKind::Link.version()
    }
}

impl JsonModel for Link {
    const TYPE_NAME: &'static str = "Link";

    fn schema() -> &'static Schema {
        &LINK_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("$context".into(), ModelKind::Link.context_uri().into());
        map.insert(
            "$contextVersion".into(),
            ModelKind::Link.schema_version().into(),
        );
        map.insert("subject".into(), self.subject.as_str().into());
        map.insert("href".into(), self.href.as_str().into());
        // "not a list" and "no relation" are written as absent keys
        if self.is_list {
            map.insert("list".into(), true.into());
        }
        if let Some(rel) = &self.rel {
            map.insert("rel".into(), rel.as_str().into());
        }
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, LINK_SCHEMA.validate(data)?);
        let link = Link::new(fields.uri("href")?, fields.uri("subject")?)
            .with_list(fields.opt_bool("list")?.unwrap_or(false));
        Ok(match fields.opt_str("rel")? {
            Some(rel) => link.with_rel(rel),
            None => link,
        })
    }
}

serde_via_json!(Link);
