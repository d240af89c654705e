//! Validated absolute URI

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::ValidationError;

/// An absolute URI (has a scheme), kept exactly as it was given.
///
/// Validation is done with [`url::Url`], but the original string is stored so
/// that `http://example.com` is not rewritten to `http://example.com/` on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri(String);

impl Uri {
    /// Create a new validated URI.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if the string is not an
    /// absolute URI or carries leading/trailing whitespace.
    pub fn new(uri: impl Into<String>) -> Result<Self, ValidationError> {
        let uri = uri.into();
        if uri.trim() != uri {
            return Err(ValidationError::invalid(
                "Uri",
                "value",
                "an absolute URI",
                format!("{uri:?}"),
            ));
        }
        match Url::parse(&uri) {
            Ok(_) => Ok(Self(uri)),
            Err(err) => Err(ValidationError::invalid(
                "Uri",
                "value",
                "an absolute URI",
                format!("{uri:?} ({err})"),
            )),
        }
    }

    /// Wraps a URI literal that is known to be valid.
    pub(crate) fn from_static(uri: &'static str) -> Self {
        Self(uri.to_string())
    }

    /// Returns the URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the URI into a [`Url`] for inspection.
    pub fn to_url(&self) -> Result<Url, ValidationError> {
        Url::parse(&self.0).map_err(|err| {
            ValidationError::invalid("Uri", "value", "an absolute URI", err.to_string())
        })
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uri {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Uri> for String {
    fn from(uri: Uri) -> String {
        uri.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_uris() {
        assert!(Uri::new("http://example.com/some-id").is_ok());
        let context = "https://github.com/ResourcefulHumans/rheactor-models#Link";
        assert!(Uri::new(context).is_ok());
        assert!(Uri::new("urn:isbn:0451450523").is_ok());
    }

    #[test]
    fn keeps_original_spelling() {
        let uri = Uri::new("http://example.com").unwrap();
        assert_eq!(uri.as_str(), "http://example.com");
        assert_eq!(uri.to_string(), "http://example.com");
    }

    #[test]
    fn to_url_exposes_components() {
        let uri = Uri::new("https://example.com/user/42?page=2").unwrap();
        let url = uri.to_url().unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/user/42");
        assert_eq!(url.query(), Some("page=2"));

        // the parsed form normalizes, the stored spelling does not
        let bare = Uri::new("http://example.com").unwrap();
        assert_eq!(bare.to_url().unwrap().as_str(), "http://example.com/");
        assert_eq!(bare.as_str(), "http://example.com");
    }

    #[test]
    fn rejects_relative_and_empty() {
        assert!(Uri::new("some-id").is_err());
        assert!(Uri::new("/relative/path").is_err());
        assert!(Uri::new("").is_err());
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        assert!(Uri::new(" http://example.com").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let uri: Uri = serde_json::from_str("\"http://example.com/a\"").unwrap();
        assert_eq!(
            serde_json::to_string(&uri).unwrap(),
            "\"http://example.com/a\""
        );
        assert!(serde_json::from_str::<Uri>("\"nope\"").is_err());
    }
}
