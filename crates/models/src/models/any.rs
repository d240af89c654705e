//! AnyModel - every model kind behind one type
//!
//! Payloads are dispatched on their `$context`: a registered context selects
//! its type, anything else is read as the most specific generic level it
//! satisfies (immutable aggregate, entity, plain model).

use serde_json::Value;

use crate::aggregates::{ImmutableAggregate, User};
use crate::context::ModelKind;
use crate::entities::Entity;
use crate::error::ValidationError;
use crate::schema::Schema;
use crate::traits::{HasContext, JsonModel};
use crate::value_objects::{HttpProblem, Link, Reference, Status, Uri};

use super::model::MODEL_SCHEMA;
use super::{Index, JsonWebToken, List, Model};

/// A model of any kind.
///
/// # Example
///
/// ```
/// use rheactor_models::{AnyModel, JsonModel, ModelKind};
/// use serde_json::json;
///
/// let status = AnyModel::from_json(&json!({
///     "$context": "https://github.com/ResourcefulHumans/rheactor-models#Status",
///     "status": "ok",
///     "time": "2016-01-01T00:00:00Z",
///     "version": "1.0.0"
/// }))
/// .unwrap();
/// assert_eq!(status.kind(), Some(ModelKind::Status));
///
/// let data = json!({"$context": "http://example.com/jsonld/some"});
/// let other = AnyModel::from_json(&data).unwrap();
/// assert!(matches!(other, AnyModel::Model(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyModel {
    Link(Link),
    List(Box<List<AnyModel>>),
    Reference(Reference),
    Index(Index),
    Status(Status),
    User(Box<User>),
    JsonWebToken(Box<JsonWebToken>),
    HttpProblem(HttpProblem),
    ImmutableAggregate(Box<ImmutableAggregate>),
    Entity(Entity),
    Model(Model),
}

impl AnyModel {
    /// The registered kind, `None` for the generic levels.
    pub fn kind(&self) -> Option<ModelKind> {
        match self {
            AnyModel::Link(_) => Some(ModelKind::Link),
            AnyModel::List(_) => Some(ModelKind::List),
            AnyModel::Reference(_) => Some(ModelKind::Reference),
            AnyModel::Index(_) => Some(ModelKind::Index),
            AnyModel::Status(_) => Some(ModelKind::Status),
            AnyModel::User(_) => Some(ModelKind::User),
            AnyModel::JsonWebToken(_) => Some(ModelKind::JsonWebToken),
            AnyModel::HttpProblem(_) => Some(ModelKind::HttpProblem),
            AnyModel::ImmutableAggregate(_) | AnyModel::Entity(_) | AnyModel::Model(_) => None,
        }
    }

    /// The `$context` the value is written with.
    pub fn context(&self) -> Uri {
        match self {
            AnyModel::ImmutableAggregate(aggregate) => aggregate.context().clone(),
            AnyModel::Entity(entity) => entity.context().clone(),
            AnyModel::Model(model) => model.context().clone(),
            AnyModel::List(list) => list.context().clone(),
            AnyModel::Index(index) => index.context().clone(),
            AnyModel::User(user) => user.context().clone(),
            AnyModel::JsonWebToken(jwt) => jwt.context().clone(),
            AnyModel::Link(_) => ModelKind::Link.context(),
            AnyModel::Reference(_) => ModelKind::Reference.context(),
            AnyModel::Status(_) => ModelKind::Status.context(),
            AnyModel::HttpProblem(_) => ModelKind::HttpProblem.context(),
        }
    }
}

impl JsonModel for AnyModel {
    const TYPE_NAME: &'static str = "Model";

    fn schema() -> &'static Schema {
        &MODEL_SCHEMA
    }

    fn to_json(&self) -> Value {
        match self {
            AnyModel::Link(link) => link.to_json(),
            AnyModel::List(list) => list.to_json(),
            AnyModel::Reference(reference) => reference.to_json(),
            AnyModel::Index(index) => index.to_json(),
            AnyModel::Status(status) => status.to_json(),
            AnyModel::User(user) => user.to_json(),
            AnyModel::JsonWebToken(jwt) => jwt.to_json(),
            AnyModel::HttpProblem(problem) => problem.to_json(),
            AnyModel::ImmutableAggregate(aggregate) => aggregate.to_json(),
            AnyModel::Entity(entity) => entity.to_json(),
            AnyModel::Model(model) => model.to_json(),
        }
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let kind = data
            .get("$context")
            .and_then(Value::as_str)
            .and_then(ModelKind::from_context);
        match kind {
            Some(ModelKind::Link) => Link::from_json(data).map(Self::from),
            Some(ModelKind::List) => List::<AnyModel>::from_json(data).map(Self::from),
            Some(ModelKind::Reference) => Reference::from_json(data).map(Self::from),
            Some(ModelKind::Index) => Index::from_json(data).map(Self::from),
            Some(ModelKind::Status) => Status::from_json(data).map(Self::from),
            Some(ModelKind::User) => User::from_json(data).map(Self::from),
            Some(ModelKind::JsonWebToken) => JsonWebToken::from_json(data).map(Self::from),
            Some(ModelKind::HttpProblem) => HttpProblem::from_json(data).map(Self::from),
            None if ImmutableAggregate::is(data) => {
                ImmutableAggregate::from_json(data).map(Self::from)
            }
            None if Entity::is(data) => Entity::from_json(data).map(Self::from),
            None => Model::from_json(data).map(Self::from),
        }
    }

    /// Whether `data` parses as some model kind.
    fn is(data: &Value) -> bool {
        Self::from_json(data).is_ok()
    }
}

serde_via_json!(AnyModel);

macro_rules! impl_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for AnyModel {
            fn from(value: $ty) -> Self {
                AnyModel::$variant(value)
            }
        }
    };
    ($variant:ident, $ty:ty, boxed) => {
        impl From<$ty> for AnyModel {
            fn from(value: $ty) -> Self {
                AnyModel::$variant(Box::new(value))
            }
        }
    };
}

impl_from!(Link, Link);
impl_from!(List, List<AnyModel>, boxed);
impl_from!(Reference, Reference);
impl_from!(Index, Index);
impl_from!(Status, Status);
impl_from!(User, User, boxed);
impl_from!(JsonWebToken, JsonWebToken, boxed);
impl_from!(HttpProblem, HttpProblem);
impl_from!(ImmutableAggregate, ImmutableAggregate, boxed);
impl_from!(Entity, Entity);
impl_from!(Model, Model);
