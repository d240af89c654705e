//! Validation errors for the model layer
//!
//! Every constructor and every `from_json` reports failures through
//! [`ValidationError`]. Each variant names the type that owns the failing
//! field and the path of that field, so callers can point at the exact key of
//! a rejected payload.

use thiserror::Error;

/// Error returned when a value or a JSON payload does not match its shape
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field is present but has the wrong shape
    #[error("{type_name}.{path}: expected {expected}, got {actual}")]
    InvalidField {
        type_name: &'static str,
        path: String,
        expected: String,
        actual: String,
    },

    /// A required field is absent or null
    #[error("{type_name}.{path}: required field is missing")]
    MissingField {
        type_name: &'static str,
        path: String,
    },

    /// The `$context` of a payload does not match the type's fixed context
    #[error("{type_name}.$context: expected {expected}, got {actual}")]
    ContextMismatch {
        type_name: &'static str,
        expected: String,
        actual: String,
    },

    /// The payload is not a JSON object
    #[error("{type_name}: expected a JSON object, got {actual}")]
    NotAnObject {
        type_name: &'static str,
        actual: String,
    },

    /// The version counter cannot be incremented any further
    #[error("{type_name}.$version: cannot increment version {current}")]
    VersionOverflow {
        type_name: &'static str,
        current: u64,
    },
}

impl ValidationError {
    /// Creates an error for a field whose value has the wrong shape.
    ///
    /// # Example
    /// ```
    /// use rheactor_models::ValidationError;
    ///
    /// let err = ValidationError::invalid("List", "itemsPerPage", "a positive integer", "0");
    /// assert_eq!(err.path(), "itemsPerPage");
    /// ```
    pub fn invalid(
        type_name: &'static str,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            type_name,
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a missing field error
    pub fn missing(type_name: &'static str, path: impl Into<String>) -> Self {
        Self::MissingField {
            type_name,
            path: path.into(),
        }
    }

    /// Create a context mismatch error
    pub fn context_mismatch(
        type_name: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ContextMismatch {
            type_name,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a non-object payload error
    pub fn not_an_object(type_name: &'static str, actual: impl Into<String>) -> Self {
        Self::NotAnObject {
            type_name,
            actual: actual.into(),
        }
    }

    /// Create a version overflow error
    pub fn version_overflow(type_name: &'static str, current: u64) -> Self {
        Self::VersionOverflow { type_name, current }
    }

    /// Name of the type that owns the failing field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::InvalidField { type_name, .. }
            | Self::MissingField { type_name, .. }
            | Self::ContextMismatch { type_name, .. }
            | Self::NotAnObject { type_name, .. }
            | Self::VersionOverflow { type_name, .. } => type_name,
        }
    }

    /// Path of the failing field, relative to the owning type.
    ///
    /// Empty when the payload as a whole was rejected.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidField { path, .. } | Self::MissingField { path, .. } => path,
            Self::ContextMismatch { .. } => "$context",
            Self::NotAnObject { .. } => "",
            Self::VersionOverflow { .. } => "$version",
        }
    }

    /// Re-homes an error raised while validating a nested value.
    ///
    /// The error is attributed to `type_name` and its path is prefixed with
    /// `prefix`, e.g. a `Link.href` failure inside `$links[2]` of a `User`
    /// becomes `User.$links[2].href`.
    pub fn nested(self, type_name: &'static str, prefix: &str) -> Self {
        let join = |path: &str| {
            if path.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{path}")
            }
        };
        match self {
            Self::InvalidField {
                path,
                expected,
                actual,
                ..
            } => Self::invalid(type_name, join(&path), expected, actual),
            Self::MissingField { path, .. } => Self::missing(type_name, join(&path)),
            Self::ContextMismatch {
                expected, actual, ..
            } => Self::invalid(
                type_name,
                join("$context"),
                format!("context {expected}"),
                actual,
            ),
            Self::NotAnObject { actual, .. } => {
                Self::invalid(type_name, prefix, "a JSON object", actual)
            }
            Self::VersionOverflow { current, .. } => Self::invalid(
                type_name,
                join("$version"),
                "an incrementable version",
                current.to_string(),
            ),
        }
    }
}
