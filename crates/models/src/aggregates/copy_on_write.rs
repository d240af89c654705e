//! Override-based transitions over the JSON form
//!
//! A transition serializes the receiver, stamps `$version` and a timestamp,
//! applies the caller's overrides on top and parses the result again. The new
//! value is therefore checked exactly like an external payload.

use serde_json::{Map, Value};

use crate::clock::Clock;
use crate::common::format_datetime;
use crate::error::ValidationError;
use crate::schema::describe;
use crate::traits::{HasVersion, JsonModel};

/// Copy-on-write `updated`/`deleted` for versioned models.
pub trait CopyOnWrite: JsonModel + HasVersion {
    /// A copy with `overrides` applied, `$updatedAt` set to `clock.now()` and
    /// the version bumped by one.
    ///
    /// Override values use the wire format expected by `from_json`. An
    /// override may set `$version` as long as it is greater than the current
    /// version.
    ///
    /// # Errors
    ///
    /// Any validation failure of the merged payload, a version that does not
    /// increase, or an override that clears `$deletedAt` of a deleted value.
    fn with_changes(
        &self,
        overrides: Map<String, Value>,
        clock: &dyn Clock,
    ) -> Result<Self, ValidationError> {
        transition(self, "$updatedAt", overrides, clock)
    }

    /// A copy with `$deletedAt` set to `clock.now()` and the version bumped.
    fn deleted_by(&self, clock: &dyn Clock) -> Result<Self, ValidationError> {
        transition(self, "$deletedAt", Map::new(), clock)
    }
}

fn transition<T: CopyOnWrite>(
    current: &T,
    stamp: &str,
    overrides: Map<String, Value>,
    clock: &dyn Clock,
) -> Result<T, ValidationError> {
    let version = current.version();
    let next = version
        .next()
        .ok_or_else(|| ValidationError::version_overflow(T::TYPE_NAME, version.get()))?;

    let mut data = match current.to_json() {
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::not_an_object(
                T::TYPE_NAME,
                describe(&other),
            ))
        }
    };
    data.insert("$version".into(), next.get().into());
    data.insert(stamp.into(), format_datetime(clock.now()).into());
    data.extend(overrides);

    let result = T::from_json(&Value::Object(data))?;
    if result.version() <= version {
        return Err(ValidationError::invalid(
            T::TYPE_NAME,
            "$version",
            format!("a version greater than {version}"),
            result.version().to_string(),
        ));
    }
    if current.is_deleted() && !result.is_deleted() {
        return Err(ValidationError::invalid(
            T::TYPE_NAME,
            "$deletedAt",
            "a deletion timestamp",
            "null",
        ));
    }
    tracing::trace!(
        type_name = T::TYPE_NAME,
        id = %result.id(),
        from = %version,
        to = %result.version(),
        stamp,
        "copy-on-write transition"
    );
    Ok(result)
}
