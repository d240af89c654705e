//! List - a paginated, linked collection

use serde_json::{Map, Value};

use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, JsonModel};
use crate::value_objects::{Link, Uri};

use super::model::{links_json, Model, MODEL_SCHEMA};
use super::AnyModel;

pub static LIST_SCHEMA: Schema = Schema::extending(
    &MODEL_SCHEMA,
    "List",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::List.context_uri()),
        ),
        FieldSpec::required("items", FieldKind::Array),
        FieldSpec::required("total", FieldKind::NonNegativeInteger),
        FieldSpec::required("itemsPerPage", FieldKind::PositiveInteger),
        FieldSpec::optional("offset", FieldKind::NonNegativeInteger),
        FieldSpec::optional("hasNext", FieldKind::Bool),
        FieldSpec::optional("hasPrev", FieldKind::Bool),
    ],
);

/// One page of a collection.
///
/// `has_next`/`has_prev` follow from the links (a link with relation `next`
/// or `prev`) and are fixed at construction; the `hasNext`/`hasPrev` keys of
/// a payload are not trusted.
///
/// # Example
///
/// ```
/// use rheactor_models::{Link, List, Model, Uri};
///
/// let next = Link::new(
///     Uri::new("http://example.com/items?offset=20").unwrap(),
///     Uri::new("http://example.com/jsonld/some").unwrap(),
/// )
/// .as_list()
/// .with_rel("next");
///
/// let page: List<Model> = List::new(Vec::new(), 21, 10, vec![next])
///     .unwrap()
///     .with_offset(10);
///
/// assert!(page.has_next());
/// assert_eq!((page.from(), page.to()), (Some(11), Some(20)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T = AnyModel> {
    model: Model,
    items: Vec<T>,
    total: u64,
    items_per_page: u64,
    offset: Option<u64>,
    has_next: bool,
    has_prev: bool,
}

impl<T> List<T> {
    /// # Errors
    ///
    /// `List.itemsPerPage` when `items_per_page` is 0.
    pub fn new(
        items: Vec<T>,
        total: u64,
        items_per_page: u64,
        links: Vec<Link>,
    ) -> Result<Self, ValidationError> {
        if items_per_page == 0 {
            return Err(ValidationError::invalid(
                "List",
                "itemsPerPage",
                FieldKind::PositiveInteger.expected(),
                "number 0",
            ));
        }
        let has_next = links.iter().any(|link| link.has_rel("next"));
        let has_prev = links.iter().any(|link| link.has_rel("prev"));
        Ok(Self {
            model: Model::new(ModelKind::List.context())
                .with_context_version(ModelKind::List.version())
                .with_links(links),
            items,
            total,
            items_per_page,
            offset: None,
            has_next,
            has_prev,
        })
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    #[inline]
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    #[inline]
    pub fn has_prev(&self) -> bool {
        self.has_prev
    }

    /// 1-based position of the first item on this page.
    ///
    /// `Some(0)` for an empty collection, `None` without an offset.
    pub fn from(&self) -> Option<u64> {
        let offset = self.offset?;
        if self.total == 0 {
            Some(0)
        } else {
            Some(offset.saturating_add(1))
        }
    }

    /// 1-based position of the last item on this page, `None` without an
    /// offset.
    pub fn to(&self) -> Option<u64> {
        let offset = self.offset?;
        Some(offset.saturating_add(self.items_per_page).min(self.total))
    }

    pub fn context() -> Uri {
        ModelKind::List.context()
    }

    /// Parses a list payload, building each item with `transform`.
    ///
    /// # Errors
    ///
    /// The first schema failure, or the first item `transform` rejects,
    /// reported as `List.items[i]...`.
    pub fn from_json_with<F>(data: &Value, mut transform: F) -> Result<Self, ValidationError>
    where
        F: FnMut(&Value) -> Result<T, ValidationError>,
    {
        let fields = Fields::new("List", LIST_SCHEMA.validate(data)?);
        let items = fields
            .array("items")?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                transform(item).map_err(|err| err.nested("List", &format!("items[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let list = Self::new(
            items,
            fields.u64("total")?,
            fields.u64("itemsPerPage")?,
            fields.links("$links")?,
        )?;
        let list = Self {
            model: list.model.with_context_version(
                fields
                    .opt_version("$contextVersion")?
                    .unwrap_or(ModelKind::List.version()),
            ),
            ..list
        };
        Ok(match fields.opt_u64("offset")? {
            Some(offset) => list.with_offset(offset),
            None => list,
        })
    }

    /// Serializes the list, writing each item with `transform`.
    pub fn to_json_with<F>(&self, transform: F) -> Value
    where
        F: FnMut(&T) -> Value,
    {
        let mut map = Map::new();
        self.model.write_json(&mut map);
        map.insert("$links".into(), links_json(self.model.links()));
        map.insert(
            "items".into(),
            Value::Array(self.items.iter().map(transform).collect()),
        );
        map.insert("total".into(), self.total.into());
        map.insert("itemsPerPage".into(), self.items_per_page.into());
        if let Some(offset) = self.offset {
            map.insert("offset".into(), offset.into());
        }
        map.insert("hasNext".into(), self.has_next.into());
        map.insert("hasPrev".into(), self.has_prev.into());
        Value::Object(map)
    }
}

impl<T> HasContext for List<T> {
    fn envelope(&self) -> &Model {
        &self.model
    }
}

impl<T: JsonModel> JsonModel for List<T> {
    const TYPE_NAME: &'static str = "List";

    fn schema() -> &'static Schema {
        &LIST_SCHEMA
    }

    fn to_json(&self) -> Value {
        self.to_json_with(T::to_json)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        Self::from_json_with(data, T::from_json)
    }
}

impl<T: JsonModel> serde::Serialize for List<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_json(), serializer)
    }
}

impl<'de, T: JsonModel> serde::Deserialize<'de> for List<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Vec<Model> {
        vec![Model::new(Uri::new("http://example.com/jsonld/some").unwrap())]
    }

    fn link() -> Link {
        Link::new(
            Uri::new("http://example.com/some-item/42").unwrap(),
            Uri::new("http://example.com/jsonld/some").unwrap(),
        )
        .as_list()
        .with_rel("next")
    }

    fn list(total: u64, offset: Option<u64>) -> List<Model> {
        let list = List::new(items(), total, 10, vec![link()]).unwrap();
        match offset {
            Some(offset) => list.with_offset(offset),
            None => list,
        }
    }

    fn validate_list(list: &List<Model>) {
        assert_eq!(list.context(), &List::<Model>::context());
        assert_eq!(list.items_per_page(), 10);
        assert_eq!(list.total(), 1);
        assert!(list.has_next());
        assert!(!list.has_prev());
        assert_eq!(list.links(), &[link()]);
        assert_eq!(list.offset(), Some(50));
    }

    mod constructor {
        use super::*;

        #[test]
        fn accepts_values() {
            validate_list(&list(1, Some(50)));
        }

        #[test]
        fn rejects_zero_items_per_page() {
            let err = List::new(items(), 1, 0, Vec::new()).unwrap_err();
            assert_eq!((err.type_name(), err.path()), ("List", "itemsPerPage"));
        }

        #[test]
        fn prev_link_sets_has_prev() {
            let prev = link().with_rel("prev");
            let list = List::new(items(), 1, 10, vec![prev]).unwrap();
            assert!(list.has_prev());
            assert!(!list.has_next());
        }
    }

    mod pagination {
        use super::*;

        #[test]
        fn from_and_to_with_offset() {
            let cases = [
                (1, 0, 1, 1),
                (9, 0, 1, 9),
                (10, 0, 1, 10),
                (11, 0, 1, 10),
                (19, 10, 11, 19),
                (20, 10, 11, 20),
                (21, 10, 11, 20),
            ];
            for (total, offset, from, to) in cases {
                let list = list(total, Some(offset));
                assert_eq!(list.from(), Some(from), "total={total} offset={offset}");
                assert_eq!(list.to(), Some(to), "total={total} offset={offset}");
            }
        }

        #[test]
        fn offset_past_total() {
            let list = list(1, Some(50));
            assert_eq!((list.from(), list.to()), (Some(51), Some(1)));
        }

        #[test]
        fn empty_collection_starts_at_zero() {
            let list = List::<Model>::new(Vec::new(), 0, 10, Vec::new())
                .unwrap()
                .with_offset(0);
            assert_eq!((list.from(), list.to()), (Some(0), Some(0)));
        }

        #[test]
        fn undefined_without_offset() {
            let list = list(1, None);
            assert_eq!(list.from(), None);
            assert_eq!(list.to(), None);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn parses_its_json_representation() {
            let text = serde_json::to_string(&list(1, Some(50))).unwrap();
            let value: Value = serde_json::from_str(&text).unwrap();
            let parsed = List::from_json_with(&value, Model::from_json).unwrap();
            validate_list(&parsed);
            assert_eq!(parsed.items(), items().as_slice());
        }

        #[test]
        fn always_writes_items_and_links() {
            let json = List::<Model>::new(Vec::new(), 0, 10, Vec::new()).unwrap().to_json();
            assert_eq!(json["items"], json!([]));
            assert_eq!(json["$links"], json!([]));
            assert_eq!(json["hasNext"], false);
            assert!(json.get("offset").is_none());
        }

        #[test]
        fn allows_empty_offset() {
            let parsed = List::<Model>::from_json(&list(1, None).to_json()).unwrap();
            assert_eq!(parsed.offset(), None);
            assert!(parsed.has_next());
        }

        #[test]
        fn recomputes_has_next_from_links() {
            let mut json = list(1, None).to_json();
            json["hasNext"] = json!(false);
            assert!(List::<Model>::from_json(&json).unwrap().has_next());
        }

        #[test]
        fn item_errors_carry_index() {
            let mut json = list(1, None).to_json();
            json["items"] = json!([items()[0].to_json(), {"$links": []}]);
            let err = List::<Model>::from_json(&json).unwrap_err();
            assert_eq!((err.type_name(), err.path()), ("List", "items[1].$context"));
        }

        #[test]
        fn rejects_bad_pagination_numbers() {
            let mut json = list(1, None).to_json();
            json["itemsPerPage"] = json!(0);
            let err = List::<Model>::from_json(&json).unwrap_err();
            assert_eq!(err.path(), "itemsPerPage");

            let mut json = list(1, None).to_json();
            json["total"] = json!(-1);
            let err = List::<Model>::from_json(&json).unwrap_err();
            assert_eq!(err.path(), "total");
        }

        #[test]
        fn context_is_pinned() {
            let mut json = list(1, None).to_json();
            json["$context"] = json!("http://example.com/jsonld/some");
            assert!(!List::<Model>::is(&json));
        }

        #[test]
        fn context_uri() {
            assert_eq!(
                List::<Model>::context().as_str(),
                "https://github.com/ResourcefulHumans/rheactor-models#List"
            );
        }
    }
}
