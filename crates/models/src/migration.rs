//! Adapters from legacy payload generations
//!
//! `from_json` only accepts the current wire form. Older writers produced
//! User payloads that differ in a few keys; [`migrate_user_payload`] rewrites
//! them before parsing.

use serde_json::Value;

use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::describe;

/// Rewrites a legacy User payload into the current wire form.
///
/// - a missing `$context` becomes the User context
/// - a `preferences` object becomes its JSON-encoded string
/// - a `$deleted` flag is dropped once it is checked against `$deletedAt`
///
/// Payloads already in the current form come back unchanged.
///
/// # Errors
///
/// When the payload is not an object or `$deleted` contradicts `$deletedAt`.
///
/// # Example
///
/// ```
/// use rheactor_models::{migrate_user_payload, JsonModel, User};
/// use serde_json::json;
///
/// let legacy = json!({
///     "$id": "http://example.com/user/42",
///     "$version": 3,
///     "$deleted": false,
///     "$createdAt": "2016-01-01T00:00:00Z",
///     "email": "john@example.com",
///     "firstname": "John",
///     "lastname": "Doe",
///     "preferences": {"lang": "de"}
/// });
///
/// let user = User::from_json(&migrate_user_payload(&legacy).unwrap()).unwrap();
/// assert_eq!(user.preference("lang"), Some(&json!("de")));
/// ```
pub fn migrate_user_payload(data: &Value) -> Result<Value, ValidationError> {
    let mut map = data
        .as_object()
        .cloned()
        .ok_or_else(|| ValidationError::not_an_object("User", describe(data)))?;
    let mut changed = Vec::new();

    if map.get("$context").filter(|context| !context.is_null()).is_none() {
        map.insert("$context".into(), ModelKind::User.context_uri().into());
        changed.push("$context");
    }

    match map.get("preferences") {
        Some(Value::Object(preferences)) => {
            let encoded = Value::Object(preferences.clone()).to_string();
            map.insert("preferences".into(), encoded.into());
            changed.push("preferences");
        }
        Some(Value::Null) => {
            map.remove("preferences");
            changed.push("preferences");
        }
        _ => {}
    }

    if let Some(flag) = map.remove("$deleted") {
        let has_deleted_at = map.get("$deletedAt").is_some_and(|at| !at.is_null());
        match flag {
            Value::Null => {}
            Value::Bool(deleted) if deleted == has_deleted_at => {}
            other => {
                return Err(ValidationError::invalid(
                    "User",
                    "$deleted",
                    format!("boolean {has_deleted_at} (as implied by $deletedAt)"),
                    describe(&other),
                ))
            }
        }
        changed.push("$deleted");
    }

    if !changed.is_empty() {
        tracing::debug!(keys = ?changed, "migrated legacy user payload");
    }
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::User;
    use crate::traits::{HasIdentity, JsonModel};
    use serde_json::json;

    fn legacy() -> Value {
        json!({
            "$id": "http://example.com/user/42",
            "$version": 3,
            "$deleted": false,
            "$createdAt": "2016-01-01T00:00:00Z",
            "email": "john@example.com",
            "firstname": "John",
            "lastname": "Doe",
            "preferences": {"lang": "de", "newsletter": true}
        })
    }

    #[test]
    fn canonical_parser_rejects_legacy_shape() {
        assert!(User::from_json(&legacy()).is_err());
    }

    #[test]
    fn migrated_payload_parses() {
        let migrated = migrate_user_payload(&legacy()).unwrap();
        assert_eq!(migrated["$context"], ModelKind::User.context_uri());
        assert!(migrated.get("$deleted").is_none());
        assert!(migrated["preferences"].is_string());

        let user = User::from_json(&migrated).unwrap();
        assert_eq!(user.preference("newsletter"), Some(&json!(true)));
        assert!(!user.is_deleted());
    }

    #[test]
    fn current_payload_is_unchanged() {
        let current = User::from_json(&migrate_user_payload(&legacy()).unwrap())
            .unwrap()
            .to_json();
        assert_eq!(migrate_user_payload(&current).unwrap(), current);
    }

    #[test]
    fn deleted_flag_must_agree() {
        let mut data = legacy();
        data["$deleted"] = json!(true);
        let err = migrate_user_payload(&data).unwrap_err();
        assert_eq!(err.path(), "$deleted");

        data["$deletedAt"] = json!("2016-01-02T00:00:00Z");
        let user = User::from_json(&migrate_user_payload(&data).unwrap()).unwrap();
        assert!(user.is_deleted());
    }

    #[test]
    fn rejects_non_object() {
        let err = migrate_user_payload(&json!("user")).unwrap_err();
        assert!(matches!(err, ValidationError::NotAnObject { .. }));
    }
}
