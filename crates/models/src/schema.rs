//! Structural schemas for raw JSON payloads
//!
//! Each model type declares a static [`Schema`]: the fields it reads, their
//! kind, and whether they are required. A schema may extend a parent schema;
//! the parent's fields are checked first and are never dropped, so an
//! `Aggregate` payload is always also a valid `Entity` and `Model` payload.
//!
//! `from_json` runs the schema over the whole raw value before any typed field
//! is built. [`Fields`] then reads the already-checked values into typed form.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::parse_datetime;
use crate::error::ValidationError;
use crate::traits::JsonModel;
use crate::value_objects::link::LINK_SCHEMA;
use crate::value_objects::{Email, Link, Uri, VersionNumber};

/// The shape a single field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// An absolute URI string
    Uri,
    /// Exactly this context URI
    FixedContext(&'static str),
    /// Any string
    String,
    /// A string with at least one non-whitespace character
    NonEmptyString,
    /// An e-mail address string
    Email,
    /// An RFC 3339 timestamp string
    Timestamp,
    Bool,
    /// An integer > 0
    VersionNumber,
    /// An integer >= 0
    NonNegativeInteger,
    /// An integer > 0
    PositiveInteger,
    /// An integer in 100..=599
    HttpStatus,
    /// An array of Link payloads
    Links,
    /// An array of anything
    Array,
    /// A string holding a JSON-encoded object
    JsonObjectString,
}

/// A named field of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    /// Shorthand for a field that must be present and non-null.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Shorthand for a field that may be absent or null.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    fn check(
        &self,
        type_name: &'static str,
        map: &Map<String, Value>,
    ) -> Result<(), ValidationError> {
        match map.get(self.name) {
            None | Some(Value::Null) if self.required => {
                Err(ValidationError::missing(type_name, self.name))
            }
            None | Some(Value::Null) => Ok(()),
            Some(value) => self.kind.check(type_name, self.name, value),
        }
    }
}

impl FieldKind {
    fn check(
        self,
        type_name: &'static str,
        path: &str,
        value: &Value,
    ) -> Result<(), ValidationError> {
        let ok = match self {
            FieldKind::Uri => value.as_str().is_some_and(|s| Uri::new(s).is_ok()),
            FieldKind::FixedContext(context) => match value.as_str() {
                Some(s) if s == context => true,
                Some(s) => return Err(ValidationError::context_mismatch(type_name, context, s)),
                None => false,
            },
            FieldKind::String => value.is_string(),
            FieldKind::NonEmptyString => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            FieldKind::Email => value.as_str().is_some_and(|s| Email::new(s).is_ok()),
            FieldKind::Timestamp => value.as_str().is_some_and(|s| parse_datetime(s).is_ok()),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::VersionNumber | FieldKind::PositiveInteger => {
                value.as_u64().is_some_and(|n| n > 0)
            }
            FieldKind::NonNegativeInteger => value.as_u64().is_some(),
            FieldKind::HttpStatus => value.as_u64().is_some_and(|n| (100..=599).contains(&n)),
            FieldKind::Links => {
                let Some(items) = value.as_array() else {
                    return Err(ValidationError::invalid(
                        type_name,
                        path,
                        self.expected(),
                        describe(value),
                    ));
                };
                for (i, item) in items.iter().enumerate() {
                    LINK_SCHEMA
                        .check_as(LINK_SCHEMA.type_name, item)
                        .map_err(|err| err.nested(type_name, &format!("{path}[{i}]")))?;
                }
                true
            }
            FieldKind::Array => value.is_array(),
            FieldKind::JsonObjectString => value
                .as_str()
                .is_some_and(|s| serde_json::from_str::<Map<String, Value>>(s).is_ok()),
        };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::invalid(
                type_name,
                path,
                self.expected(),
                describe(value),
            ))
        }
    }

    /// Human readable description used in error messages.
    pub fn expected(self) -> &'static str {
        match self {
            FieldKind::Uri => "an absolute URI",
            FieldKind::FixedContext(context) => context,
            FieldKind::String => "a string",
            FieldKind::NonEmptyString => "a non-empty string",
            FieldKind::Email => "an e-mail address",
            FieldKind::Timestamp => "an ISO-8601 timestamp",
            FieldKind::Bool => "a boolean",
            FieldKind::VersionNumber => "a version number (integer > 0)",
            FieldKind::NonNegativeInteger => "an integer >= 0",
            FieldKind::PositiveInteger => "an integer > 0",
            FieldKind::HttpStatus => "an HTTP status code",
            FieldKind::Links => "a list of links",
            FieldKind::Array => "an array",
            FieldKind::JsonObjectString => "a JSON-encoded object",
        }
    }
}

/// A named structural schema, optionally extending a parent schema.
#[derive(Debug)]
pub struct Schema {
    pub type_name: &'static str,
    parent: Option<&'static Schema>,
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(type_name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            type_name,
            parent: None,
            fields,
        }
    }

    /// A schema that checks all of `parent`'s fields, then its own.
    pub const fn extending(
        parent: &'static Schema,
        type_name: &'static str,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            type_name,
            parent: Some(parent),
            fields,
        }
    }

    /// Validates a raw payload, returning its object map.
    ///
    /// # Errors
    ///
    /// The first field that does not match, attributed to this schema's type.
    pub fn validate<'a>(&self, data: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
        let result = self.check_as(self.type_name, data);
        if let Err(err) = &result {
            tracing::debug!(
                type_name = err.type_name(),
                path = err.path(),
                error = %err,
                "rejected JSON payload"
            );
        }
        result
    }

    /// Like [`Schema::validate`] but only answers yes or no.
    pub fn matches(&self, data: &Value) -> bool {
        self.check_as(self.type_name, data).is_ok()
    }

    /// Whether this schema or one of its parents declares `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
            || self.parent.is_some_and(|parent| parent.declares(name))
    }

    fn check_as<'a>(
        &self,
        type_name: &'static str,
        data: &'a Value,
    ) -> Result<&'a Map<String, Value>, ValidationError> {
        let map = data
            .as_object()
            .ok_or_else(|| ValidationError::not_an_object(type_name, describe(data)))?;
        self.check_fields(type_name, map)?;
        Ok(map)
    }

    fn check_fields(
        &self,
        type_name: &'static str,
        map: &Map<String, Value>,
    ) -> Result<(), ValidationError> {
        if let Some(parent) = self.parent {
            parent.check_fields(type_name, map)?;
        }
        self.fields
            .iter()
            .try_for_each(|field| field.check(type_name, map))
    }
}

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) if s.chars().count() > 64 => {
            format!("string {:?}...", s.chars().take(64).collect::<String>())
        }
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}

/// Typed reader over a validated payload.
///
/// Every accessor re-checks the value it reads, so a reader never panics even
/// on a map that skipped validation; errors carry the owning type and key.
pub(crate) struct Fields<'a> {
    type_name: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(type_name: &'static str, map: &'a Map<String, Value>) -> Self {
        Self { type_name, map }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|value| !value.is_null())
    }

    fn require(&self, name: &str) -> Result<&'a Value, ValidationError> {
        self.get(name)
            .ok_or_else(|| ValidationError::missing(self.type_name, name))
    }

    fn mismatch(&self, name: &str, kind: FieldKind, value: &Value) -> ValidationError {
        ValidationError::invalid(self.type_name, name, kind.expected(), describe(value))
    }

    pub(crate) fn str(&self, name: &str) -> Result<&'a str, ValidationError> {
        let value = self.require(name)?;
        value
            .as_str()
            .ok_or_else(|| self.mismatch(name, FieldKind::String, value))
    }

    pub(crate) fn opt_str(&self, name: &str) -> Result<Option<&'a str>, ValidationError> {
        self.get(name).is_some().then(|| self.str(name)).transpose()
    }

    pub(crate) fn uri(&self, name: &str) -> Result<Uri, ValidationError> {
        let value = self.require(name)?;
        value
            .as_str()
            .and_then(|s| Uri::new(s).ok())
            .ok_or_else(|| self.mismatch(name, FieldKind::Uri, value))
    }

    pub(crate) fn opt_uri(&self, name: &str) -> Result<Option<Uri>, ValidationError> {
        self.get(name).is_some().then(|| self.uri(name)).transpose()
    }

    pub(crate) fn email(&self, name: &str) -> Result<Email, ValidationError> {
        let value = self.require(name)?;
        value
            .as_str()
            .and_then(|s| Email::new(s).ok())
            .ok_or_else(|| self.mismatch(name, FieldKind::Email, value))
    }

    pub(crate) fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, ValidationError> {
        let value = self.require(name)?;
        value
            .as_str()
            .and_then(|s| parse_datetime(s).ok())
            .ok_or_else(|| self.mismatch(name, FieldKind::Timestamp, value))
    }

    pub(crate) fn opt_timestamp(
        &self,
        name: &str,
    ) -> Result<Option<DateTime<Utc>>, ValidationError> {
        self.get(name)
            .is_some()
            .then(|| self.timestamp(name))
            .transpose()
    }

    pub(crate) fn opt_bool(&self, name: &str) -> Result<Option<bool>, ValidationError> {
        self.get(name)
            .map(|value| {
                value
                    .as_bool()
                    .ok_or_else(|| self.mismatch(name, FieldKind::Bool, value))
            })
            .transpose()
    }

    pub(crate) fn u64(&self, name: &str) -> Result<u64, ValidationError> {
        let value = self.require(name)?;
        value
            .as_u64()
            .ok_or_else(|| self.mismatch(name, FieldKind::NonNegativeInteger, value))
    }

    pub(crate) fn opt_u64(&self, name: &str) -> Result<Option<u64>, ValidationError> {
        self.get(name).is_some().then(|| self.u64(name)).transpose()
    }

    pub(crate) fn version(&self, name: &str) -> Result<VersionNumber, ValidationError> {
        let value = self.require(name)?;
        value
            .as_u64()
            .and_then(|n| VersionNumber::new(n).ok())
            .ok_or_else(|| self.mismatch(name, FieldKind::VersionNumber, value))
    }

    pub(crate) fn opt_version(&self, name: &str) -> Result<Option<VersionNumber>, ValidationError> {
        self.get(name)
            .is_some()
            .then(|| self.version(name))
            .transpose()
    }

    pub(crate) fn array(&self, name: &str) -> Result<&'a [Value], ValidationError> {
        let value = self.require(name)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mismatch(name, FieldKind::Array, value))
    }

    /// Reads a list of links; an absent key is an empty list.
    pub(crate) fn links(&self, name: &str) -> Result<Vec<Link>, ValidationError> {
        let Some(value) = self.get(name) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.mismatch(name, FieldKind::Links, value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Link::from_json(item)
                    .map_err(|err| err.nested(self.type_name, &format!("{name}[{i}]")))
            })
            .collect()
    }

    /// Reads a string holding a JSON object; absent is an empty map.
    pub(crate) fn json_object_string(
        &self,
        name: &str,
    ) -> Result<Map<String, Value>, ValidationError> {
        let Some(value) = self.get(name) else {
            return Ok(Map::new());
        };
        value
            .as_str()
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| self.mismatch(name, FieldKind::JsonObjectString, value))
    }
}
