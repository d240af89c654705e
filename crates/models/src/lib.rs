//! JSON-serializable models for hypermedia APIs
//!
//! Every resource carries a `$context` URI naming its schema, a
//! `$contextVersion` and a list of `$links`. On top of that envelope the crate
//! layers identity ([`Entity`]), versioning ([`Aggregate`],
//! [`ImmutableAggregate`]) and a handful of concrete resources ([`List`],
//! [`Index`], [`User`], [`JsonWebToken`], ...).
//!
//! Values are validated when built and when parsed; `from_json` checks the
//! whole payload against the type's [`Schema`] before constructing anything.
//!
//! ```
//! use rheactor_models::{JsonModel, Link, Uri};
//!
//! let link = Link::new(
//!     Uri::new("http://example.com/api/user/42").unwrap(),
//!     Uri::new("https://github.com/ResourcefulHumans/rheactor-models#User").unwrap(),
//! );
//! let parsed = Link::from_json(&link.to_json()).unwrap();
//! assert_eq!(parsed, link);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

#[macro_use]
mod macros;

pub mod aggregates;
pub mod clock;
pub mod common;
pub mod context;
pub mod entities;
pub mod error;
pub mod migration;
pub mod models;
pub mod schema;
pub mod traits;
pub mod value_objects;

pub use aggregates::{Aggregate, CopyOnWrite, ImmutableAggregate, User};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::ModelKind;
pub use entities::Entity;
pub use error::ValidationError;
pub use migration::migrate_user_payload;
pub use models::{AnyModel, Index, JsonWebToken, List, Model};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use traits::{HasContext, HasIdentity, HasVersion, JsonModel};
pub use value_objects::{Email, HttpProblem, Link, Reference, Status, Uri, VersionNumber};
