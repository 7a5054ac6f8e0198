//! Pack metadata file format.
//!
//! ```json
//! {
//!     "version": "1.12.2",
//!     "directory": "/srv/minecraft/mods",
//!     "mods": {
//!         "jei": { "manually": true, "dependants": [] }
//!     }
//! }
//! ```

use crate::types::ModId;
use crate::version::GameVersion;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Why a mod is in a pack, and who depends on it there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Requested by the user rather than pulled in as a dependency.
    pub manually: bool,
    /// Pack members that require this mod at the pack's version.
    #[serde(default)]
    pub dependants: BTreeSet<ModId>,
}

impl Membership {
    /// A fresh membership record without dependants.
    pub fn new(manually: bool) -> Self {
        Self {
            manually,
            dependants: BTreeSet::new(),
        }
    }

    /// Not manually added and nothing in the pack needs it anymore.
    pub fn is_obsolete(&self) -> bool {
        !self.manually && self.dependants.is_empty()
    }
}

/// Contents of a pack file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    /// Target version every member must publish a file for.
    pub version: GameVersion,
    /// Where member files are materialized.
    pub directory: PathBuf,
    /// Membership table keyed by mod id.
    #[serde(default)]
    pub mods: BTreeMap<ModId, Membership>,
}

impl PackManifest {
    /// An empty pack for `version`, materializing into `directory`.
    pub fn new(version: GameVersion, directory: impl Into<PathBuf>) -> Self {
        Self {
            version,
            directory: directory.into(),
            mods: BTreeMap::new(),
        }
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: &ModId) -> bool {
        self.mods.contains_key(id)
    }

    /// Ids of all obsolete members, in map order.
    pub fn obsolete(&self) -> Vec<ModId> {
        self.mods
            .iter()
            .filter(|(_, m)| m.is_obsolete())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> ModId {
        ModId::new(s).unwrap()
    }

    #[test]
    fn test_roundtrip_compares_dependants_as_sets() {
        let raw = json!({
            "version": "1.12.2",
            "directory": "packs/survival",
            "mods": {
                "a": { "manually": false, "dependants": ["c", "b"] },
                "b": { "manually": true, "dependants": [] },
                "c": { "manually": true, "dependants": [] }
            }
        });
        let manifest: PackManifest = serde_json::from_value(raw).unwrap();
        let text = serde_json::to_string(&manifest).unwrap();
        let back: PackManifest = serde_json::from_str(&text).unwrap();

        assert_eq!(back, manifest);
        assert_eq!(
            back.mods[&id("a")].dependants,
            [id("b"), id("c")].into_iter().collect()
        );
    }

    #[test]
    fn test_obsolete_members() {
        let mut manifest = PackManifest::new(GameVersion::new("1.12.2").unwrap(), "mods");
        manifest.mods.insert(id("lib"), Membership::new(false));
        manifest.mods.insert(id("app"), Membership::new(true));
        let mut used = Membership::new(false);
        used.dependants.insert(id("app"));
        manifest.mods.insert(id("core"), used);

        assert_eq!(manifest.obsolete(), vec![id("lib")]);
        assert!(manifest.contains(&id("core")));
        assert!(!manifest.contains(&id("other")));
    }

    #[test]
    fn test_rejects_bad_version() {
        let raw = json!({ "version": "1.12", "directory": "x", "mods": {} });
        assert!(serde_json::from_value::<PackManifest>(raw).is_err());
    }
}
