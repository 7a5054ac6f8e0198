//! Two-level attribute store for mod metadata.
//!
//! On disk this is a JSON object with a `general` mapping plus one mapping per
//! version string:
//!
//! ```json
//! {
//!     "general": { "name": "jei", "dependencies": [] },
//!     "1.12.2": { "jar": "jei_1.12.2-4.16.jar", "link": "1.12.2.jar" }
//! }
//! ```
//!
//! A version mapping overrides or extends `general` for that version only.

use crate::version::GameVersion;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A flat key → value mapping.
pub type AttributeMap = BTreeMap<String, Value>;

/// General attributes plus per-version overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    general: AttributeMap,
    #[serde(flatten)]
    versions: BTreeMap<GameVersion, AttributeMap>,
}

impl Attributes {
    /// Create a store with the given general attributes and no overrides.
    pub fn with_general(general: AttributeMap) -> Self {
        Self {
            general,
            versions: BTreeMap::new(),
        }
    }

    /// Look up `key`, preferring the override for `version` when one exists.
    ///
    /// Falls back to the general mapping when no version is given, the
    /// version has no mapping, or the mapping lacks `key`.
    ///
    /// # Example
    ///
    /// ```
    /// use modlib_schema::{Attributes, GameVersion};
    /// use serde_json::json;
    ///
    /// let mut attrs = Attributes::default();
    /// let v = GameVersion::new("1.2.3").unwrap();
    /// attrs.set("x", json!(1), None);
    /// attrs.set("x", json!(2), Some(&v));
    ///
    /// assert_eq!(attrs.get("x", Some(&v)), Some(&json!(2)));
    /// assert_eq!(attrs.get("x", Some(&GameVersion::new("9.9.9").unwrap())), Some(&json!(1)));
    /// assert_eq!(attrs.get("y", None), None);
    /// ```
    pub fn get(&self, key: &str, version: Option<&GameVersion>) -> Option<&Value> {
        version
            .and_then(|v| self.get_override(key, v))
            .or_else(|| self.general.get(key))
    }

    /// Look up `key` in the mapping of `version` only, ignoring `general`.
    pub fn get_override(&self, key: &str, version: &GameVersion) -> Option<&Value> {
        self.versions.get(version).and_then(|m| m.get(key))
    }

    /// Store `value` under `key` for `version`, or in `general` when no
    /// version is given. A new version mapping is created on first use.
    pub fn set(&mut self, key: &str, value: Value, version: Option<&GameVersion>) {
        let map = match version {
            Some(v) => self.versions.entry(v.clone()).or_default(),
            None => &mut self.general,
        };
        map.insert(key.to_string(), value);
    }

    /// The general (default) mapping.
    pub fn general(&self) -> &AttributeMap {
        &self.general
    }

    /// The override mapping for one version, if any.
    pub fn version(&self, version: &GameVersion) -> Option<&AttributeMap> {
        self.versions.get(version)
    }

    /// All versions that carry an override mapping, in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = &GameVersion> {
        self.versions.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(s: &str) -> GameVersion {
        GameVersion::new(s).unwrap()
    }

    #[test]
    fn test_override_then_general_then_missing() {
        let mut attrs = Attributes::default();
        attrs.set("x", json!(1), None);
        attrs.set("x", json!(2), Some(&v("1.2.3")));

        assert_eq!(attrs.get("x", Some(&v("1.2.3"))), Some(&json!(2)));
        assert_eq!(attrs.get("x", Some(&v("9.9.9"))), Some(&json!(1)));
        assert_eq!(attrs.get("x", None), Some(&json!(1)));
        assert_eq!(attrs.get("y", None), None);
        assert_eq!(attrs.get("y", Some(&v("1.2.3"))), None);
    }

    #[test]
    fn test_version_mapping_without_key_falls_back() {
        let mut attrs = Attributes::default();
        attrs.set("name", json!("jei"), None);
        attrs.set("jar", json!("jei.jar"), Some(&v("1.12.2")));

        assert_eq!(attrs.get("name", Some(&v("1.12.2"))), Some(&json!("jei")));
        assert_eq!(attrs.get_override("name", &v("1.12.2")), None);
        assert_eq!(attrs.get("jar", None), None);
    }

    #[test]
    fn test_on_disk_shape() {
        let mut attrs = Attributes::default();
        attrs.set("dependencies", json!([]), None);
        attrs.set("link", json!("1.12.2.jar"), Some(&v("1.12.2")));

        let value = serde_json::to_value(&attrs).unwrap();
        assert_eq!(
            value,
            json!({
                "general": { "dependencies": [] },
                "1.12.2": { "link": "1.12.2.jar" }
            })
        );

        let back: Attributes = serde_json::from_value(value).unwrap();
        assert_eq!(back, attrs);
        assert_eq!(back.versions().collect::<Vec<_>>(), vec![&v("1.12.2")]);
    }

    #[test]
    fn test_malformed_version_key_is_rejected() {
        let raw = json!({ "general": {}, "latest": {} });
        assert!(serde_json::from_value::<Attributes>(raw).is_err());
    }
}
