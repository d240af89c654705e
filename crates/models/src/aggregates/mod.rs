//! Aggregates - versioned entities with copy-on-write transitions
//!
//! - [`Aggregate`] - the version field group, with direct struct transitions
//! - [`ImmutableAggregate`] - an aggregate that keeps unknown properties and
//!   is updated through a map of overrides
//! - [`User`] - the user account resource
//!
//! All three implement [`CopyOnWrite`].

pub mod aggregate;
pub mod copy_on_write;
pub mod immutable_aggregate;
pub mod user;

pub use aggregate::{Aggregate, AGGREGATE_SCHEMA};
pub use copy_on_write::CopyOnWrite;
pub use immutable_aggregate::{ImmutableAggregate, IMMUTABLE_AGGREGATE_SCHEMA};
pub use user::{User, USER_SCHEMA};
