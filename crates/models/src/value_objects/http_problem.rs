//! Problem details for HTTP APIs (RFC 7807)

use serde_json::{Map, Value};

use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{FieldKind, FieldSpec, Fields, Schema};
use crate::traits::JsonModel;
use crate::value_objects::Uri;

static HTTP_PROBLEM_SCHEMA: Schema = Schema::new(
    "HttpProblem",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::HttpProblem.context_uri()),
        ),
        FieldSpec::optional("$contextVersion", FieldKind::VersionNumber),
        FieldSpec::required("type", FieldKind::Uri),
        FieldSpec::required("title", FieldKind::String),
        FieldSpec::required("status", FieldKind::HttpStatus),
        FieldSpec::optional("detail", FieldKind::String),
    ],
);

/// A machine readable error document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProblem {
    problem_type: Uri,
    title: String,
    status: u16,
    detail: Option<String>,
}

impl HttpProblem {
    /// Create a new problem.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if `status` is not in 100..=599.
    pub fn new(
        problem_type: Uri,
        title: impl Into<String>,
        status: u16,
    ) -> Result<Self, ValidationError> {
        if !(100..=599).contains(&status) {
            return Err(ValidationError::invalid(
                "HttpProblem",
                "status",
                FieldKind::HttpStatus.expected(),
                status.to_string(),
            ));
        }
        Ok(Self {
            problem_type,
            title: title.into(),
            status,
            detail: None,
        })
    }

    /// A `400 Bad Request` problem describing a rejected payload.
    pub fn from_validation_error(problem_type: Uri, err: &ValidationError) -> Self {
        Self {
            problem_type,
            title: err.to_string(),
            status: 400,
            detail: Some(match err.path() {
                "" => err.type_name().to_string(),
                path => format!("{}.{path}", err.type_name()),
            }),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[inline]
    pub fn problem_type(&self) -> &Uri {
        &self.problem_type
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl JsonModel for HttpProblem {
    const TYPE_NAME: &'static str = "HttpProblem";

    fn schema() -> &'static Schema {
        &HTTP_PROBLEM_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        let context = ModelKind::HttpProblem.context_uri();
        map.insert("$context".into(), context.into());
        map.insert("type".into(), self.problem_type.as_str().into());
        map.insert("title".into(), self.title.as_str().into());
        map.insert("status".into(), self.status.into());
        if let Some(detail) = &self.detail {
            map.insert("detail".into(), detail.as_str().into());
        }
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, HTTP_PROBLEM_SCHEMA.validate(data)?);
        let status = u16::try_from(fields.u64("status")?).map_err(|_| {
            ValidationError::invalid(
                Self::TYPE_NAME,
                "status",
                FieldKind::HttpStatus.expected(),
                "an out of range number",
            )
        })?;
        let problem = Self::new(fields.uri("type")?, fields.str("title")?, status)?;
        Ok(match fields.opt_str("detail")? {
            Some(detail) => problem.with_detail(detail),
            None => problem,
        })
    }
}

serde_via_json!(HttpProblem);
