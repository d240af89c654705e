//! Context registry
//!
//! Every fixed-context model type is listed here with the URI that tags its
//! JSON and the schema version it currently writes. The table is static and
//! read-only; the reverse index from URI to kind is built on first use.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::value_objects::{Uri, VersionNumber};

/// Type tag of a model with a fixed context URI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Link,
    List,
    Reference,
    Index,
    Status,
    User,
    JsonWebToken,
    HttpProblem,
}

static BY_CONTEXT: Lazy<HashMap<&'static str, ModelKind>> = Lazy::new(|| {
    ModelKind::ALL
        .iter()
        .map(|kind| (kind.context_uri(), *kind))
        .collect()
});

impl ModelKind {
    /// Every registered kind.
    pub const ALL: [ModelKind; 8] = [
        ModelKind::Link,
        ModelKind::List,
        ModelKind::Reference,
        ModelKind::Index,
        ModelKind::Status,
        ModelKind::User,
        ModelKind::JsonWebToken,
        ModelKind::HttpProblem,
    ];

    /// The context URI this kind writes to `$context`.
    pub const fn context_uri(self) -> &'static str {
        match self {
            ModelKind::Link => "https://github.com/ResourcefulHumans/rheactor-models#Link",
            ModelKind::List => "https://github.com/ResourcefulHumans/rheactor-models#List",
            ModelKind::Reference => {
                "https://github.com/ResourcefulHumans/rheactor-models#Reference"
            }
            ModelKind::Index => "https://github.com/ResourcefulHumans/rheactor-models#Index",
            ModelKind::Status => "https://github.com/ResourcefulHumans/rheactor-models#Status",
            ModelKind::User => "https://github.com/ResourcefulHumans/rheactor-models#User",
            ModelKind::JsonWebToken => "https://tools.ietf.org/html/rfc7519",
            ModelKind::HttpProblem => {
                "https://www.ietf.org/id/draft-ietf-appsawg-http-problem-01.txt"
            }
        }
    }

    /// Current schema version written to `$contextVersion`.
    pub const fn schema_version(self) -> u64 {
        match self {
            ModelKind::Link
            | ModelKind::List
            | ModelKind::Reference
            | ModelKind::Index
            | ModelKind::Status
            | ModelKind::User
            | ModelKind::JsonWebToken
            | ModelKind::HttpProblem => 1,
        }
    }

    /// The type name used in error messages.
    pub const fn type_name(self) -> &'static str {
        match self {
            ModelKind::Link => "Link",
            ModelKind::List => "List",
            ModelKind::Reference => "Reference",
            ModelKind::Index => "Index",
            ModelKind::Status => "Status",
            ModelKind::User => "User",
            ModelKind::JsonWebToken => "JsonWebToken",
            ModelKind::HttpProblem => "HttpProblem",
        }
    }

    /// The context URI as a typed value.
    pub fn context(self) -> Uri {
        Uri::from_static(self.context_uri())
    }

    /// The schema version as a typed value.
    pub fn version(self) -> VersionNumber {
        VersionNumber::new(self.schema_version()).unwrap_or_default()
    }

    /// Looks up the kind registered for a context URI.
    pub fn from_context(uri: &str) -> Option<ModelKind> {
        BY_CONTEXT.get(uri).copied()
    }
}
