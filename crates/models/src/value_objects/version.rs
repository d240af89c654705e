//! Positive version counters

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// A positive integer version (schema versions and aggregate versions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct VersionNumber(u64);

impl VersionNumber {
    /// The first version of anything.
    pub const INITIAL: Self = Self(1);

    /// Create a new version number.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` for `0`.
    pub fn new(version: u64) -> Result<Self, ValidationError> {
        if version == 0 {
            return Err(ValidationError::invalid(
                "VersionNumber",
                "value",
                "a positive integer",
                "0",
            ));
        }
        Ok(Self(version))
    }

    /// Returns the raw counter.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// The version after this one, or `None` on overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Default for VersionNumber {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for VersionNumber {
    type Error = ValidationError;

    fn try_from(version: u64) -> Result<Self, Self::Error> {
        Self::new(version)
    }
}

impl From<VersionNumber> for u64 {
    fn from(version: VersionNumber) -> u64 {
        version.0
    }
}
