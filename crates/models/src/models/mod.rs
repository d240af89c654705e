//! Models - the `$context` envelope and the resources built directly on it
//!
//! - [`Model`] - the envelope every resource carries
//! - [`List`] - one page of a collection
//! - [`Index`] - the API discovery resource
//! - [`JsonWebToken`] - an access token with decoded claims
//! - [`AnyModel`] - any of the above, dispatched by `$context`

pub mod any;
pub mod index;
pub mod json_web_token;
pub mod list;
pub mod model;

pub use any::AnyModel;
pub use index::{Index, INDEX_SCHEMA};
pub use json_web_token::{JsonWebToken, JSON_WEB_TOKEN_SCHEMA};
pub use list::{List, LIST_SCHEMA};
pub use model::{Model, MODEL_SCHEMA};
