//! Identifier newtypes and schema-level errors.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Errors raised while validating identifiers and versions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The string is not a dotted `major.minor.patch` version.
    #[error("'{0}' is not a valid version (expected major.minor.patch)")]
    InvalidVersion(String),

    /// The string cannot be used as a mod id.
    #[error("'{0}' is not a valid mod id: {1}")]
    InvalidModId(String, &'static str),
}

/// Identifier of a mod.
///
/// Doubles as the mod's storage directory name, so it must be a single
/// non-empty path component.
///
/// # Example
///
/// ```
/// use modlib_schema::ModId;
///
/// let id = ModId::new("jei").unwrap();
/// assert_eq!(id.as_str(), "jei");
/// assert!(ModId::new("../escape").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModId(String);

impl ModId {
    /// Validate and wrap a mod id.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidModId`] if `id` is empty, is `.` or
    /// `..`, or contains a path separator.
    pub fn new(id: &str) -> Result<Self, SchemaError> {
        let reason = if id.is_empty() {
            Some("empty")
        } else if id == "." || id == ".." {
            Some("reserved name")
        } else if id.contains(['/', '\\']) {
            Some("contains a path separator")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SchemaError::InvalidModId(id.to_string(), reason)),
            None => Ok(Self(id.to_string())),
        }
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModId {
    type Error = SchemaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<ModId> for String {
    fn from(id: ModId) -> Self {
        id.0
    }
}

impl std::ops::Deref for ModId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ModId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for ModId {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl Borrow<str> for ModId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ModId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_id_rejects_path_like_ids() {
        assert!(ModId::new("").is_err());
        assert!(ModId::new(".").is_err());
        assert!(ModId::new("..").is_err());
        assert!(ModId::new("a/b").is_err());
        assert!(ModId::new("a\\b").is_err());
    }

    #[test]
    fn test_mod_id_accepts_plain_names() {
        let id = ModId::new("applied-energistics 2").unwrap();
        assert_eq!(id, "applied-energistics 2");
        assert_eq!(id.to_string(), "applied-energistics 2");
    }

    #[test]
    fn test_mod_id_serde_validates() {
        let id: ModId = serde_json::from_str("\"jei\"").unwrap();
        assert_eq!(id.as_str(), "jei");
        assert!(serde_json::from_str::<ModId>("\"../jei\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"jei\"");
    }
}
