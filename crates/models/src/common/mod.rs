//! Small helpers shared by the model types.
//!
//! - **Pure functions only** - no side effects, no I/O
//! - timestamps on the wire are RFC 3339 / ISO-8601 strings

pub mod datetime;
pub mod string;

pub use datetime::{format_datetime, parse_datetime};
pub use string::some_if_not_empty;
