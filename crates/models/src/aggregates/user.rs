//! User - the user account resource

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::context::ModelKind;
use crate::entities::Entity;
use crate::error::ValidationError;
use crate::models::Model;
use crate::schema::{describe, FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, HasIdentity, HasVersion, JsonModel};
use crate::value_objects::{Email, Link, Uri, VersionNumber};

use super::aggregate::{Aggregate, AGGREGATE_SCHEMA};
use super::CopyOnWrite;

pub static USER_SCHEMA: Schema = Schema::extending(
    &AGGREGATE_SCHEMA,
    "User",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::User.context_uri()),
        ),
        FieldSpec::required("email", FieldKind::Email),
        FieldSpec::required("firstname", FieldKind::NonEmptyString),
        FieldSpec::required("lastname", FieldKind::NonEmptyString),
        FieldSpec::optional("avatar", FieldKind::Uri),
        FieldSpec::optional("superUser", FieldKind::Bool),
        FieldSpec::optional("active", FieldKind::Bool),
        FieldSpec::optional("preferences", FieldKind::JsonObjectString),
    ],
);

/// A user account.
///
/// `preferences` is a free-form map in memory and a JSON-encoded string on
/// the wire; it is left out of the JSON while empty.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rheactor_models::{Email, HasVersion, JsonModel, Uri, User, VersionNumber};
///
/// let user = User::new(
///     Uri::new("http://example.com/user/42").unwrap(),
///     VersionNumber::new(17).unwrap(),
///     Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap(),
///     Email::new("john@example.com").unwrap(),
///     "John",
///     "Doe",
/// )
/// .unwrap();
///
/// assert_eq!(user.full_name(), "John Doe");
/// assert!(!user.is_super_user());
/// assert_eq!(User::from_json(&user.to_json()).unwrap(), user);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    aggregate: Aggregate,
    email: Email,
    firstname: String,
    lastname: String,
    avatar: Option<Uri>,
    super_user: bool,
    active: bool,
    preferences: Map<String, Value>,
}

impl User {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// # Errors
    ///
    /// `User.firstname` / `User.lastname` when blank.
    pub fn new(
        id: Uri,
        version: VersionNumber,
        created_at: DateTime<Utc>,
        email: Email,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let model = Model::new(ModelKind::User.context())
            .with_context_version(ModelKind::User.version());
        let entity = Entity::new(model, id).with_created_at(created_at);
        Ok(Self {
            aggregate: Aggregate::with_type_name("User", entity, version)?,
            email,
            firstname: non_empty("firstname", firstname.into())?,
            lastname: non_empty("lastname", lastname.into())?,
            avatar: None,
            super_user: false,
            active: false,
            preferences: Map::new(),
        })
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_avatar(mut self, avatar: Uri) -> Self {
        self.avatar = Some(avatar);
        self
    }

    pub fn with_super_user(mut self, super_user: bool) -> Self {
        self.super_user = super_user;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_preferences(mut self, preferences: Map<String, Value>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_links(self, links: impl IntoIterator<Item = Link>) -> Self {
        let model = self.envelope().clone().with_links(links);
        self.map_entity(|entity| entity.with_model(model))
    }

    pub fn with_updated_at(self, updated_at: DateTime<Utc>) -> Self {
        self.map_entity(|entity| entity.with_updated_at(updated_at))
    }

    pub fn with_deleted_at(self, deleted_at: DateTime<Utc>) -> Self {
        self.map_entity(|entity| entity.with_deleted_at(deleted_at))
    }

    fn map_entity(mut self, f: impl FnOnce(Entity) -> Entity) -> Self {
        self.aggregate = self.aggregate.map_entity(f);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[inline]
    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    #[inline]
    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    /// First and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    #[inline]
    pub fn avatar(&self) -> Option<&Uri> {
        self.avatar.as_ref()
    }

    #[inline]
    pub fn is_super_user(&self) -> bool {
        self.super_user
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn preferences(&self) -> &Map<String, Value> {
        &self.preferences
    }

    pub fn preference(&self, key: &str) -> Option<&Value> {
        self.preferences.get(key)
    }

    #[inline]
    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// A copy with `updated_at` set to `at` (or now) and the version bumped.
    pub fn updated(
        &self,
        at: Option<DateTime<Utc>>,
        new_version: Option<VersionNumber>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            aggregate: self.aggregate.updated_as(Self::TYPE_NAME, at, new_version)?,
            ..self.clone()
        })
    }

    /// A copy with `deleted_at` set to `at` (or now) and the version bumped.
    pub fn deleted(
        &self,
        at: Option<DateTime<Utc>>,
        new_version: Option<VersionNumber>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            aggregate: self.aggregate.deleted_as(Self::TYPE_NAME, at, new_version)?,
            ..self.clone()
        })
    }

    /// The fixed context of every user.
    pub fn context() -> Uri {
        ModelKind::User.context()
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::invalid(
            "User",
            field,
            FieldKind::NonEmptyString.expected(),
            describe(&Value::String(value)),
        ));
    }
    Ok(value)
}

impl HasContext for User {
    fn envelope(&self) -> &Model {
        self.aggregate.envelope()
    }
}

impl HasIdentity for User {
    fn identity(&self) -> &Entity {
        self.aggregate.entity()
    }
}

impl HasVersion for User {
    fn version(&self) -> VersionNumber {
        self.aggregate.version()
    }
}

impl JsonModel for User {
    const TYPE_NAME: &'static str = "User";

    fn schema() -> &'static Schema {
        &USER_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.aggregate.write_json(&mut map);
        map.insert("email".into(), self.email.as_str().into());
        map.insert("firstname".into(), self.firstname.as_str().into());
        map.insert("lastname".into(), self.lastname.as_str().into());
        if let Some(avatar) = &self.avatar {
            map.insert("avatar".into(), avatar.as_str().into());
        }
        map.insert("superUser".into(), self.super_user.into());
        map.insert("active".into(), self.active.into());
        if !self.preferences.is_empty() {
            let encoded = Value::Object(self.preferences.clone()).to_string();
            map.insert("preferences".into(), encoded.into());
        }
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, USER_SCHEMA.validate(data)?);
        Ok(Self {
            aggregate: Aggregate::read_json(&fields)?,
            email: fields.email("email")?,
            firstname: fields.str("firstname")?.to_string(),
            lastname: fields.str("lastname")?.to_string(),
            avatar: fields.opt_uri("avatar")?,
            super_user: fields.opt_bool("superUser")?.unwrap_or(false),
            active: fields.opt_bool("active")?.unwrap_or(false),
            preferences: fields.json_object_string("preferences")?,
        })
    }
}

impl CopyOnWrite for User {}

serde_via_json!(User);

// ============================================================================
// Tests
// ============================================================================
