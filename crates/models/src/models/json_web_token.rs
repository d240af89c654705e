//! JsonWebToken - an encoded token plus its decoded claims
//!
//! The token is decoded, never verified: the payload segment is
//! base64url-decoded and parsed, the registered claims are lifted into typed
//! fields and everything else stays in [`JsonWebToken::payload`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::clock::{Clock, SystemClock};
use crate::context::ModelKind;
use crate::error::ValidationError;
use crate::schema::{describe, FieldKind, FieldSpec, Fields, Schema};
use crate::traits::{HasContext, JsonModel};
use crate::value_objects::{Link, Uri};

use super::model::{Model, MODEL_SCHEMA};

pub static JSON_WEB_TOKEN_SCHEMA: Schema = Schema::extending(
    &MODEL_SCHEMA,
    "JsonWebToken",
    &[
        FieldSpec::required(
            "$context",
            FieldKind::FixedContext(ModelKind::JsonWebToken.context_uri()),
        ),
        FieldSpec::required("token", FieldKind::String),
    ],
);

const JWT_TYPE_NAME: &str = "JsonWebToken";
const EXPECTED_TOKEN: &str = "a compact JWT with a JSON object payload";

/// A JSON Web Token (RFC 7519) as handed out by an API.
///
/// # Example
///
/// ```
/// use rheactor_models::JsonWebToken;
///
/// // {"alg":"HS256","typ":"JWT"} . {"sub":"42","exp":4102444800,"role":"admin"} . signature
/// let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
///              eyJzdWIiOiI0MiIsImV4cCI6NDEwMjQ0NDgwMCwicm9sZSI6ImFkbWluIn0.\
///              c2lnbmF0dXJl";
/// let jwt = JsonWebToken::new(token, Vec::new()).unwrap();
///
/// assert_eq!(jwt.sub(), Some("42"));
/// assert_eq!(jwt.payload()["role"], "admin");
/// assert!(!jwt.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonWebToken {
    model: Model,
    token: String,
    iss: Option<String>,
    sub: Option<String>,
    aud: Vec<String>,
    exp: Option<DateTime<Utc>>,
    nbf: Option<DateTime<Utc>>,
    iat: Option<DateTime<Utc>>,
    jti: Option<String>,
    payload: Map<String, Value>,
}

impl JsonWebToken {
    /// Decodes `token`.
    ///
    /// # Errors
    ///
    /// `JsonWebToken.token` when the token has no payload segment, the
    /// segment is not base64url, not a JSON object, or a registered claim has
    /// the wrong type.
    pub fn new(token: impl Into<String>, links: Vec<Link>) -> Result<Self, ValidationError> {
        let token = token.into();
        let mut payload = decode_payload(&token)?;
        Ok(Self {
            model: Model::new(ModelKind::JsonWebToken.context())
                .with_context_version(ModelKind::JsonWebToken.version())
                .with_links(links),
            iss: take_string(&mut payload, "iss")?,
            sub: take_string(&mut payload, "sub")?,
            aud: take_audience(&mut payload)?,
            exp: take_time(&mut payload, "exp")?,
            nbf: take_time(&mut payload, "nbf")?,
            iat: take_time(&mut payload, "iat")?,
            jti: take_string(&mut payload, "jti")?,
            payload,
            token,
        })
    }

    /// The encoded token, exactly as given.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Issuer
    pub fn iss(&self) -> Option<&str> {
        self.iss.as_deref()
    }

    /// Subject
    pub fn sub(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Audience; a single string claim is a one-element list.
    pub fn aud(&self) -> &[String] {
        &self.aud
    }

    /// Expiration time
    pub fn exp(&self) -> Option<DateTime<Utc>> {
        self.exp
    }

    /// Not before
    pub fn nbf(&self) -> Option<DateTime<Utc>> {
        self.nbf
    }

    /// Issued at
    pub fn iat(&self) -> Option<DateTime<Utc>> {
        self.iat
    }

    /// JWT ID
    pub fn jti(&self) -> Option<&str> {
        self.jti.as_deref()
    }

    /// The claims that are not registered claims.
    #[inline]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Whether `exp` lies in the past. A token without `exp` never expires.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemClock.now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp < now)
    }

    pub fn context() -> Uri {
        ModelKind::JsonWebToken.context()
    }
}

fn bad_token(actual: impl Into<String>) -> ValidationError {
    ValidationError::invalid(JWT_TYPE_NAME, "token", EXPECTED_TOKEN, actual)
}

fn decode_payload(token: &str) -> Result<Map<String, Value>, ValidationError> {
    let segment = token
        .split('.')
        .nth(1)
        .ok_or_else(|| bad_token("a token without payload segment"))?;
    // some issuers pad the segments
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|err| bad_token(format!("undecodable payload ({err})")))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(other) => Err(bad_token(format!("payload {}", describe(&other)))),
        Err(err) => Err(bad_token(format!("malformed payload JSON ({err})"))),
    }
}

fn claim_error(claim: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::invalid(
        JWT_TYPE_NAME,
        "token",
        format!("claim {claim:?} to be {expected}"),
        describe(value),
    )
}

fn take_string(
    payload: &mut Map<String, Value>,
    claim: &str,
) -> Result<Option<String>, ValidationError> {
    match payload.remove(claim) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(claim_error(claim, "a string", &other)),
    }
}

fn take_audience(payload: &mut Map<String, Value>) -> Result<Vec<String>, ValidationError> {
    match payload.remove("aud") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s]),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(claim_error("aud", "a list of strings", &other)),
            })
            .collect(),
        Some(other) => Err(claim_error("aud", "a string or a list of strings", &other)),
    }
}

/// Reads a NumericDate claim (seconds since the epoch, fractions allowed).
fn take_time(
    payload: &mut Map<String, Value>,
    claim: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let value = match payload.remove(claim) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let millis = match &value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| secs.checked_mul(1000))
            .or_else(|| n.as_f64().map(|secs| (secs * 1000.0).round() as i64)),
        _ => None,
    };
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map(Some)
        .ok_or_else(|| claim_error(claim, "seconds since the epoch", &value))
}

impl HasContext for JsonWebToken {
    fn envelope(&self) -> &Model {
        &self.model
    }
}

impl JsonModel for JsonWebToken {
    const TYPE_NAME: &'static str = JWT_TYPE_NAME;

    fn schema() -> &'static Schema {
        &JSON_WEB_TOKEN_SCHEMA
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.model.write_json(&mut map);
        map.insert("token".into(), self.token.as_str().into());
        Value::Object(map)
    }

    fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(Self::TYPE_NAME, JSON_WEB_TOKEN_SCHEMA.validate(data)?);
        let model = Model::read_json(&fields)?;
        let jwt = Self::new(fields.str("token")?, model.links().to_vec())?;
        Ok(Self {
            model: jwt.model.with_context_version(model.context_version()),
            ..jwt
        })
    }
}

serde_via_json!(JsonWebToken);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use serde_json::json;

    const SECRET: &[u8] = b"mysecret";

    fn sign(claims: Value) -> String {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(SECRET);
        encode(&header, &claims, &key).unwrap()
    }

    fn now_secs() -> i64 {
        Utc::now().timestamp()
    }

    mod constructor {
        use super::*;

        #[test]
        fn parses_a_token() {
            let now = now_secs();
            let token = sign(json!({
                "foo": "bar",
                "iss": "test",
                "sub": "foo",
                "iat": now,
                "nbf": now - 60,
                "exp": now + 3600
            }));
            let jwt = JsonWebToken::new(token.clone(), Vec::new()).unwrap();

            assert_eq!(jwt.iss(), Some("test"));
            assert_eq!(jwt.sub(), Some("foo"));
            assert_eq!(jwt.nbf().map(|t| t.timestamp()), Some(now - 60));
            assert_eq!(jwt.exp().map(|t| t.timestamp()), Some(now + 3600));
            assert_eq!(jwt.iat().map(|t| t.timestamp()), Some(now));
            assert!(jwt.aud().is_empty());
            assert_eq!(jwt.jti(), None);
            assert_eq!(Value::Object(jwt.payload().clone()), json!({"foo": "bar"}));
            assert_eq!(jwt.token(), token);
            assert_eq!(jwt.context(), &JsonWebToken::context());

            // the token is passed through untouched, so it still verifies
            let mut validation = Validation::new(Algorithm::HS256);
            validation.set_issuer(&["test"]);
            let key = DecodingKey::from_secret(SECRET);
            assert!(decode::<Value>(jwt.token(), &key, &validation).is_ok());
        }

        #[test]
        fn audience_accepts_string_or_list() {
            let single = JsonWebToken::new(sign(json!({"aud": "app"})), Vec::new()).unwrap();
            assert_eq!(single.aud(), ["app".to_string()]);

            let many = JsonWebToken::new(sign(json!({"aud": ["a", "b"]})), Vec::new()).unwrap();
            assert_eq!(many.aud(), ["a".to_string(), "b".to_string()]);
        }

        #[test]
        fn rejects_garbage() {
            for token in ["", "no-dots", "a.!!!.c", "a.bnVsbA.c"] {
                let err = JsonWebToken::new(token, Vec::new()).unwrap_err();
                assert_eq!(err.type_name(), "JsonWebToken", "{token}");
                assert_eq!(err.path(), "token", "{token}");
            }
        }

        #[test]
        fn rejects_mistyped_registered_claim() {
            let err = JsonWebToken::new(sign(json!({"exp": "tomorrow"})), Vec::new()).unwrap_err();
            assert_eq!(err.path(), "token");
            assert!(err.to_string().contains("exp"));
        }
    }

    mod is_expired {
        use super::*;

        #[test]
        fn true_if_expired() {
            let claims = json!({"foo": "bar", "exp": now_secs() - 10});
            let jwt = JsonWebToken::new(sign(claims), Vec::new()).unwrap();
            assert!(jwt.is_expired());
        }

        #[test]
        fn false_if_not_yet_expired() {
            let claims = json!({"exp": now_secs() + 3600});
            let jwt = JsonWebToken::new(sign(claims), Vec::new()).unwrap();
            assert!(!jwt.is_expired());
        }

        #[test]
        fn never_without_exp() {
            let jwt = JsonWebToken::new(sign(json!({"foo": "bar"})), Vec::new()).unwrap();
            assert!(!jwt.is_expired());
            let far_future = Utc.with_ymd_and_hms(9999, 1, 1, 0, 0, 0).unwrap();
            assert!(!jwt.is_expired_at(far_future));
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn roundtrip_with_links() {
            let link = Link::new(
                Uri::new("http://example.com/api/token/renew").unwrap(),
                JsonWebToken::context(),
            )
            .with_rel("renew");
            let jwt = JsonWebToken::new(sign(json!({"sub": "42"})), vec![link]).unwrap();
            let json = jwt.to_json();
            assert_eq!(json["$context"], ModelKind::JsonWebToken.context_uri());
            assert_eq!(JsonWebToken::from_json(&json).unwrap(), jwt);
        }

        #[test]
        fn requires_token() {
            let data = json!({"$context": ModelKind::JsonWebToken.context_uri()});
            let err = JsonWebToken::from_json(&data).unwrap_err();
            assert!(matches!(err, ValidationError::MissingField { .. }));
        }

        #[test]
        fn rejects_foreign_context() {
            let jwt = JsonWebToken::new(sign(json!({"sub": "42"})), Vec::new()).unwrap();
            let mut json = jwt.to_json();
            json["$context"] = json!("http://example.com/jsonld/some");

            assert!(!JsonWebToken::is(&json));
            let err = JsonWebToken::from_json(&json).unwrap_err();
            assert!(matches!(err, ValidationError::ContextMismatch { .. }));
            assert_eq!(err.type_name(), "JsonWebToken");
        }
    }
}
