//! Health check snapshots

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::format_datetime;
use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::JsonModel;

static STATUS_SCHEMA: Schema = Schema::new(
    "Status",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::Status.context_uri()),
        ),
        FieldSpec::optional("$contextVersion", FieldKind::VersionNumber),
        FieldSpec::required("status", FieldKind::String),
        FieldSpec::required("time", FieldKind::Timestamp),
        FieldSpec::required("version", FieldKind::String),
    ],
);

/// The status of a service at a point in time, e.g. `("ok", now, "1.2.3")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    status: String,
    time: DateTime<Utc>,
    version: String,
}

impl Status {
    pub fn new(status: impl Into<String>, time: DateTime<Utc>, version: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            time,
            version: version.into(),
        }
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[inline]
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Build or release identifier of the reporting service.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl JsonModel for Status {
    const TYPE_NAME: &'static str = "Status";

    fn schema() -> &'static Schema {
        &STATUS_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("$context".into(), ModelKind::Status.context_uri().into());
        map.insert("status".into(), self.status.as_str().into());
        map.insert("time".into(), format_datetime(self.time).into());
        map.insert("version".into(), self.version.as_str().into());
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, STATUS_SCHEMA.validate(data)?);
        Ok(Self::new(
            fields.str("status")?,
            fields.timestamp("time")?,
            fields.str("version")?,
        ))
    }
}

serde_via_json!(Status);
