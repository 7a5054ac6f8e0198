//! Mod storage and the per-process mod cache.

use crate::config::{Config, JsonConfig};
use crate::error::{Error, Result};
use crate::mods::Mod;
use crate::paths::{self, MOD_FILE};
use modlib_schema::{GameVersion, ModId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Access point for every mod in a storage root.
///
/// Holds at most one in-memory [`Mod`] per id: repeated lookups return the
/// same instance instead of re-reading the metadata file, so unsaved changes
/// made through one lookup are visible to the next.
#[derive(Debug)]
pub struct ModRegistry {
    root: PathBuf,
    json: JsonConfig,
    loaded: HashMap<ModId, Mod>,
}

impl ModRegistry {
    /// Open the storage rooted at `root`.
    ///
    /// The root is made absolute because stored paths end up as symlink
    /// targets. Nothing is created until the first [`create`](Self::create).
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn new(root: &Path, json: JsonConfig) -> Result<Self> {
        let root = paths::absolute(root).map_err(|e| Error::io(root, e))?;
        debug!("Mod storage at {}", root.display());
        Ok(Self {
            root,
            json,
            loaded: HashMap::new(),
        })
    }

    /// Open the storage configured in `config`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.storage_dir(), config.json)
    }

    /// Absolute storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage directory of `id`, whether or not it exists.
    pub fn mod_dir(&self, id: &ModId) -> PathBuf {
        self.root.join(id)
    }

    /// Whether `id` is loaded or has metadata in storage.
    pub fn contains(&self, id: &ModId) -> bool {
        self.loaded.contains_key(id) || self.mod_dir(id).join(MOD_FILE).is_file()
    }

    /// Create a new mod with an empty dependency list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModExists`] if the id is taken and [`Error::Io`] if
    /// the directory or metadata cannot be written.
    pub fn create(&mut self, id: &ModId) -> Result<&mut Mod> {
        if self.contains(id) {
            return Err(Error::ModExists { id: id.clone() });
        }
        std::fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;

        let created = Mod::create(id.clone(), self.mod_dir(id), self.json)?;
        Ok(self.loaded.entry(id.clone()).or_insert(created))
    }

    /// Return the loaded instance of `id`, reading it from storage on first
    /// access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMod`] if there is no metadata for `id`, or an
    /// I/O or JSON error if it cannot be read.
    pub fn get_or_load(&mut self, id: &ModId) -> Result<&mut Mod> {
        match self.loaded.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let dir = self.root.join(id);
                let loaded = Mod::load(id.clone(), dir, self.json)?;
                Ok(entry.insert(loaded))
            }
        }
    }

    /// The loaded instance of `id`, without touching storage.
    pub fn get(&self, id: &ModId) -> Option<&Mod> {
        self.loaded.get(id)
    }

    /// All mod ids in storage, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage root exists but cannot be listed.
    pub fn list(&self) -> Result<Vec<ModId>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.root, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.root, e))?;
            if !entry.path().join(MOD_FILE).is_file() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str().and_then(|n| ModId::new(n).ok()) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Declare `deps` as dependencies of `id` and persist.
    ///
    /// See [`Mod::add_dependencies`] for how version overrides are started.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMod`] if `id` or any dependency is not in
    /// storage; nothing is changed in that case.
    pub fn add_dependencies(
        &mut self,
        id: &ModId,
        deps: &[ModId],
        version: Option<&GameVersion>,
    ) -> Result<()> {
        if let Some(missing) = deps.iter().find(|d| !self.contains(d)) {
            return Err(Error::UnknownMod {
                id: missing.clone(),
            });
        }
        let target = self.get_or_load(id)?;
        target.add_dependencies(deps, version)?;
        target.write()
    }
}
