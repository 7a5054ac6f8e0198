//! Target version strings.
//!
//! Every version used as a lookup key (mod attribute overrides, pack targets)
//! goes through [`valid_version`] first, so malformed strings never reach
//! storage.

use crate::types::SchemaError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // `[0-9]` rather than `\d`: the latter also matches non-ASCII digits.
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version pattern is a valid regex")
});

/// Check that `version` looks like `major.minor.patch` with numeric components.
///
/// Returns the input unchanged on success.
///
/// # Example
///
/// ```
/// use modlib_schema::valid_version;
///
/// assert_eq!(valid_version("1.12.2").unwrap(), "1.12.2");
/// assert!(valid_version("1.12").is_err());
/// ```
///
/// # Errors
///
/// Returns [`SchemaError::InvalidVersion`] if the string does not match.
pub fn valid_version(version: &str) -> Result<&str, SchemaError> {
    if VERSION_PATTERN.is_match(version) {
        Ok(version)
    } else {
        Err(SchemaError::InvalidVersion(version.to_string()))
    }
}

/// A validated target version such as `1.12.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameVersion(String);

impl GameVersion {
    /// Validate and wrap a version string.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidVersion`] if the string is not a dotted
    /// numeric `major.minor.patch` version.
    pub fn new(version: &str) -> Result<Self, SchemaError> {
        valid_version(version).map(|v| Self(v.to_string()))
    }

    /// Return the version string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric components, saturating on absurdly long digit runs.
    fn components(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.split('.').map(|c| c.parse().unwrap_or(u64::MAX))
    }
}

impl Ord for GameVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.components()
            .cmp(other.components())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for GameVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for GameVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GameVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GameVersion {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<GameVersion> for String {
    fn from(v: GameVersion) -> Self {
        v.0
    }
}

impl std::ops::Deref for GameVersion {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for GameVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GameVersion {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GameVersion {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_versions_pass_through() {
        for v in ["1.12.2", "1.7.10", "0.0.0", "10.200.3000"] {
            assert_eq!(valid_version(v).unwrap(), v);
            assert_eq!(GameVersion::new(v).unwrap().as_str(), v);
        }
    }

    #[test]
    fn test_invalid_versions_rejected() {
        for v in ["abc", "1.2", "1.x.2", "", "1.2.3.4", "1.2.3-pre", " 1.2.3", "1..2", "١.٢.٣"] {
            assert_eq!(
                valid_version(v),
                Err(SchemaError::InvalidVersion(v.to_string())),
                "{v:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_version_ordering_is_numeric() {
        let mut versions: Vec<GameVersion> = ["1.12.2", "1.7.10", "1.10.2"]
            .iter()
            .map(|v| GameVersion::new(v).unwrap())
            .collect();
        versions.sort();
        assert_eq!(versions, vec!["1.7.10", "1.10.2", "1.12.2"]);
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<GameVersion>("\"1.12.2\"").is_ok());
        assert!(serde_json::from_str::<GameVersion>("\"latest\"").is_err());
    }
}
