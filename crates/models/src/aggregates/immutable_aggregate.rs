//! ImmutableAggregate - an aggregate updated through property overrides

use serde_json::{Map, Value};

use crate::clock::SystemClock;
use crate::entities::Entity;
use crate::error::ValidationError;
use crate::models::Model;
use crate::schema::{Fields, Schema};
use crate::traits::{HasContext, HasIdentity, HasVersion, JsonModel};
use crate::value_objects::VersionNumber;

use super::aggregate::{Aggregate, AGGREGATE_SCHEMA};
use super::CopyOnWrite;

pub static IMMUTABLE_AGGREGATE_SCHEMA: Schema =
    Schema::extending(&AGGREGATE_SCHEMA, "ImmutableAggregate", &[]);

/// An aggregate that carries arbitrary extra properties.
///
/// Keys of a payload that the aggregate schema does not declare are kept
/// verbatim and written back by `to_json`, so overrides passed to
/// [`ImmutableAggregate::updated`] survive the round trip.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use rheactor_models::{Entity, HasVersion, ImmutableAggregate, Model, Uri, VersionNumber};
/// use serde_json::json;
///
/// let aggregate = ImmutableAggregate::new(
///     Entity::new(
///         Model::new(Uri::new("http://example.com/jsonld/some").unwrap()),
///         Uri::new("http://example.com/some-id").unwrap(),
///     )
///     .with_created_at(Utc::now()),
///     VersionNumber::INITIAL,
/// )
/// .unwrap();
///
/// let mut overrides = serde_json::Map::new();
/// overrides.insert("foo".into(), json!("baz"));
/// let updated = aggregate.updated(overrides).unwrap();
///
/// assert_eq!(updated.version().get(), 2);
/// assert_eq!(updated.property("foo"), Some(&json!("baz")));
/// assert_eq!(aggregate.property("foo"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmutableAggregate {
    aggregate: Aggregate,
    properties: Map<String, Value>,
}

impl ImmutableAggregate {
    /// # Errors
    ///
    /// `ImmutableAggregate.$createdAt` when the entity has no creation time.
    pub fn new(entity: Entity, version: VersionNumber) -> Result<Self, ValidationError> {
        Ok(Self {
            aggregate: Aggregate::with_type_name("ImmutableAggregate", entity, version)?,
            properties: Map::new(),
        })
    }

    /// Set an extra property.
    ///
    /// # Errors
    ///
    /// When `name` is one of the aggregate's own fields (`$id`, `$version`, ...).
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if IMMUTABLE_AGGREGATE_SCHEMA.declares(&name) {
            return Err(ValidationError::invalid(
                "ImmutableAggregate",
                name.clone(),
                "an undeclared property name",
                format!("declared field {name:?}"),
            ));
        }
        self.properties.insert(name, value);
        Ok(self)
    }

    #[inline]
    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    #[inline]
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// A copy with `overrides` applied, `updated_at` set to now and the
    /// version bumped by one.
    pub fn updated(&self, overrides: Map<String, Value>) -> Result<Self, ValidationError> {
        self.with_changes(overrides, &SystemClock)
    }

    /// A copy with `deleted_at` set to now and the version bumped by one.
    pub fn deleted(&self) -> Result<Self, ValidationError> {
        self.deleted_by(&SystemClock)
    }
}

impl HasContext for ImmutableAggregate {
    fn envelope(&self) -> &Model {
        self.aggregate.envelope()
    }
}

impl HasIdentity for ImmutableAggregate {
    fn identity(&self) -> &Entity {
        self.aggregate.entity()
    }
}

impl HasVersion for ImmutableAggregate {
    fn version(&self) -> VersionNumber {
        self.aggregate.version()
    }
}

impl JsonModel for ImmutableAggregate {
    const TYPE_NAME: &'static str = "ImmutableAggregate";

    fn schema() -> &'static Schema {
        &IMMUTABLE_AGGREGATE_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.aggregate.write_json(&mut map);
        for (name, value) in &self.properties {
            map.entry(name.as_str()).or_insert_with(|| value.clone());
        }
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let map = IMMUTABLE_AGGREGATE_SCHEMA.validate(data)?;
        let aggregate = Aggregate::read_json(&Fields::new(Self::TYPE_NAME, map))?;
        let properties = map
            .iter()
            .filter(|(name, _)| !IMMUTABLE_AGGREGATE_SCHEMA.declares(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Ok(Self {
            aggregate,
            properties,
        })
    }
}

impl CopyOnWrite for ImmutableAggregate {}

serde_via_json!(ImmutableAggregate);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::schema::{FieldKind, FieldSpec};
    use crate::value_objects::Uri;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 1, day, 0, 0, 0).unwrap()
    }

    fn context() -> Uri {
        Uri::new("http://example.com/jsonld/some").unwrap()
    }

    fn entity() -> Entity {
        let id = Uri::new("http://example.com/some-id").unwrap();
        Entity::new(Model::new(context()), id).with_created_at(at(1))
    }

    fn aggregate() -> ImmutableAggregate {
        ImmutableAggregate::new(entity(), VersionNumber::new(17).unwrap()).unwrap()
    }

    fn overrides(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("overrides must be an object"),
        }
    }

    /// A model built on top of an aggregate with one typed field.
    #[derive(Debug, Clone, PartialEq)]
    struct Thing {
        aggregate: Aggregate,
        foo: String,
    }

    static THING_SCHEMA: Schema = Schema::extending(
        &AGGREGATE_SCHEMA,
        "Thing",
        &[FieldSpec::required("foo", FieldKind::String)],
    );

    impl HasContext for Thing {
        fn envelope(&self) -> &Model {
            self.aggregate.envelope()
        }
    }

    impl HasIdentity for Thing {
        fn identity(&self) -> &Entity {
            self.aggregate.entity()
        }
    }

    impl HasVersion for Thing {
        fn version(&self) -> VersionNumber {
            self.aggregate.version()
        }
    }

    impl JsonModel for Thing {
        const TYPE_NAME: &'static str = "Thing";

        fn schema() -> &'static Schema {
            &THING_SCHEMA
        }

        fn to_json(&self) -> Value {
            let mut map = Map::new();
            self.aggregate.write_json(&mut map);
            map.insert("foo".into(), self.foo.clone().into());
            Value::Object(map)
        }

        fn from_json(data: &Value) -> Result<Self, ValidationError> {
            let fields = Fields::new(Self::TYPE_NAME, THING_SCHEMA.validate(data)?);
            Ok(Self {
                aggregate: Aggregate::read_json(&fields)?,
                foo: fields.str("foo")?.to_string(),
            })
        }
    }

    impl CopyOnWrite for Thing {}

    mod constructor {
        use super::*;

        #[test]
        fn accepts_values() {
            let aggregate = aggregate();
            let id = Uri::new("http://example.com/some-id").unwrap();
            assert_eq!(aggregate.id(), &id);
            assert_eq!(aggregate.version().get(), 17);
            assert!(!aggregate.is_deleted());
            assert_eq!(aggregate.context(), &context());
            assert_eq!(aggregate.created_at(), Some(at(1)));
            assert!(aggregate.links().is_empty());
        }

        #[test]
        fn requires_created_at() {
            let id = Uri::new("http://example.com/some-id").unwrap();
            let entity = Entity::new(Model::new(context()), id);
            let err = ImmutableAggregate::new(entity, VersionNumber::INITIAL).unwrap_err();
            assert_eq!(
                (err.type_name(), err.path()),
                ("ImmutableAggregate", "$createdAt")
            );
        }

        #[test]
        fn declared_fields_are_not_properties() {
            assert!(aggregate().with_property("$version", json!(3)).is_err());
            let with_foo = aggregate().with_property("foo", json!("bar")).unwrap();
            assert_eq!(with_foo.property("foo"), Some(&json!("bar")));
        }
    }

    mod updated {
        use super::*;

        #[test]
        fn creates_a_new_instance() {
            let original = aggregate();
            let updated = original.updated(Map::new()).unwrap();
            assert_eq!(original.version().get(), 17);
            assert_eq!(updated.version().get(), 18);
            assert_ne!(updated, original);
            let created = original.created_at().unwrap();
            assert!(updated.updated_at().unwrap() > created);
        }

        #[test]
        fn applies_overrides_as_properties() {
            let original = aggregate().with_property("foo", json!("bar")).unwrap();
            let updated = original
                .with_changes(overrides(json!({"foo": "baz"})), &FixedClock(at(2)))
                .unwrap();
            assert_eq!(original.property("foo"), Some(&json!("bar")));
            assert_eq!(updated.property("foo"), Some(&json!("baz")));
            assert_eq!(updated.updated_at(), Some(at(2)));
        }

        #[test]
        fn applies_overrides_to_typed_fields() {
            let thing = Thing {
                aggregate: Aggregate::new(entity(), VersionNumber::INITIAL).unwrap(),
                foo: "bar".to_string(),
            };
            let changed = thing
                .with_changes(overrides(json!({"foo": "baz"})), &FixedClock(at(2)))
                .unwrap();
            assert_eq!(changed.version().get(), 2);
            assert_eq!(thing.foo, "bar");
            assert_eq!(changed.foo, "baz");
        }

        #[test]
        fn invalid_override_is_rejected() {
            let changes = overrides(json!({"$createdAt": "yesterday"}));
            let err = aggregate()
                .with_changes(changes, &FixedClock(at(2)))
                .unwrap_err();
            assert_eq!(
                (err.type_name(), err.path()),
                ("ImmutableAggregate", "$createdAt")
            );
        }

        #[test]
        fn version_override_must_increase() {
            let original = aggregate();
            let jumped = original
                .with_changes(overrides(json!({"$version": 40})), &FixedClock(at(2)))
                .unwrap();
            assert_eq!(jumped.version().get(), 40);

            let err = original
                .with_changes(overrides(json!({"$version": 17})), &FixedClock(at(2)))
                .unwrap_err();
            assert_eq!(err.path(), "$version");
        }

        #[test]
        fn cannot_resurrect() {
            let deleted = aggregate().deleted_by(&FixedClock(at(3))).unwrap();
            let err = deleted
                .with_changes(overrides(json!({"$deletedAt": null})), &FixedClock(at(4)))
                .unwrap_err();
            assert_eq!(err.path(), "$deletedAt");
        }
    }

    mod deleted {
        use super::*;

        #[test]
        fn creates_a_deleted_instance() {
            let original = aggregate();
            let deleted = original.deleted().unwrap();
            assert_eq!(original.version().get(), 17);
            assert!(!original.is_deleted());
            assert!(deleted.is_deleted());
            assert_eq!(deleted.version().get(), 18);
            let created = original.created_at().unwrap();
            assert!(deleted.deleted_at().unwrap() > created);
        }

        #[test]
        fn updating_keeps_deleted() {
            let deleted = aggregate().deleted_by(&FixedClock(at(3))).unwrap();
            let updated = deleted.with_changes(Map::new(), &FixedClock(at(4))).unwrap();
            assert!(updated.is_deleted());
            assert_eq!(updated.modified_at(), Some(at(3)));
            assert_eq!(updated.version().get(), 19);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn parses_its_own_json() {
            let original = aggregate()
                .with_property("foo", json!({"nested": [1, 2]}))
                .unwrap();
            let text = serde_json::to_string(&original).unwrap();
            let parsed: ImmutableAggregate = serde_json::from_str(&text).unwrap();
            assert_eq!(parsed, original);
            assert_eq!(parsed.version().get(), 17);
            assert_eq!(parsed.created_at(), Some(at(1)));
        }

        #[test]
        fn deleted_flag_is_not_a_property() {
            let mut data = aggregate().to_json();
            data["$deleted"] = json!(false);
            let parsed = ImmutableAggregate::from_json(&data).unwrap();
            assert!(parsed.properties().is_empty());
        }
    }
}
