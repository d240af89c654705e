//! Value objects - validated scalars and identity-less values
//!
//! Everything here is valid by construction: a `Uri` is always absolute, an
//! `Email` always well-formed, a `VersionNumber` always positive.

pub mod email;
pub mod http_problem;
pub mod link;
pub mod reference;
pub mod status;
pub mod uri;
pub mod version;

pub use email::Email;
pub use http_problem::HttpProblem;
pub use link::Link;
pub use reference::Reference;
pub use status::Status;
pub use uri::Uri;
pub use version::VersionNumber;
