//! Per-mod metadata: general attributes, version overrides and stored files.

use crate::config::JsonConfig;
use crate::error::{Error, Result};
use crate::fs;
use crate::paths::MOD_FILE;
use modlib_schema::{
    AttributeMap, Attributes, DEPENDENCIES, GameVersion, JAR, LINK, ModId, NAME, valid_version,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A mod in storage.
///
/// Instances are owned by a [`ModRegistry`](crate::ModRegistry), which hands
/// out the single in-memory copy per id.
#[derive(Debug)]
pub struct Mod {
    id: ModId,
    dir: PathBuf,
    attributes: Attributes,
    json: JsonConfig,
}

impl Mod {
    /// Allocate the storage directory and write initial metadata.
    pub(crate) fn create(id: ModId, dir: PathBuf, json: JsonConfig) -> Result<Self> {
        std::fs::create_dir(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::ModExists { id: id.clone() },
            _ => Error::io(&dir, e),
        })?;

        let mut general = AttributeMap::new();
        general.insert(DEPENDENCIES.to_string(), Value::Array(Vec::new()));
        general.insert(NAME.to_string(), Value::from(id.as_str()));

        let created = Self {
            id,
            dir,
            attributes: Attributes::with_general(general),
            json,
        };
        created.write()?;
        info!("Created mod {}", created.id);
        Ok(created)
    }

    /// Read metadata from the storage directory.
    pub(crate) fn load(id: ModId, dir: PathBuf, json: JsonConfig) -> Result<Self> {
        let path = dir.join(MOD_FILE);
        debug!("Loading {}", path.display());
        let attributes = match fs::read_json(&path) {
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::UnknownMod { id });
            }
            other => other?,
        };
        Ok(Self {
            id,
            dir,
            attributes,
            json,
        })
    }

    /// The mod's id.
    pub fn id(&self) -> &ModId {
        &self.id
    }

    /// Absolute storage directory of this mod.
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// All attributes, general and per version.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get an attribute, preferring the override for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeNotFound`] if the key is set neither for
    /// `version` nor in general.
    pub fn get(&self, key: &str, version: Option<&GameVersion>) -> Result<&Value> {
        self.attributes
            .get(key, version)
            .ok_or_else(|| Error::AttributeNotFound {
                id: self.id.clone(),
                key: key.to_string(),
            })
    }

    /// Like [`get`](Self::get), but the value must be a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeNotFound`] if missing and
    /// [`Error::AttributeType`] if the value is not a string.
    pub fn get_str(&self, key: &str, version: Option<&GameVersion>) -> Result<&str> {
        self.get(key, version)?
            .as_str()
            .ok_or_else(|| Error::AttributeType {
                id: self.id.clone(),
                key: key.to_string(),
                expected: "a string",
            })
    }

    /// Set an attribute for `version`, or in general when `version` is `None`.
    ///
    /// Only changes memory; call [`write`](Self::write) to persist.
    pub fn set(&mut self, key: &str, value: Value, version: Option<&GameVersion>) {
        self.attributes.set(key, value, version);
    }

    /// Resolve a filename attribute (`jar` or `link`) inside the storage
    /// directory.
    ///
    /// # Errors
    ///
    /// Same as [`get_str`](Self::get_str).
    pub fn file(&self, key: &str, version: Option<&GameVersion>) -> Result<PathBuf> {
        Ok(self.dir.join(self.get_str(key, version)?))
    }

    /// Display name for `version`; member files in packs are named after it.
    ///
    /// # Errors
    ///
    /// Same as [`get_str`](Self::get_str).
    pub fn name(&self, version: Option<&GameVersion>) -> Result<&str> {
        self.get_str(NAME, version)
    }

    /// Mods this mod requires at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeNotFound`] if no dependency list is set and
    /// [`Error::AttributeType`] if it is not a list of valid mod ids.
    pub fn dependencies(&self, version: Option<&GameVersion>) -> Result<Vec<ModId>> {
        let value = self.get(DEPENDENCIES, version)?;
        serde_json::from_value(value.clone()).map_err(|_| Error::AttributeType {
            id: self.id.clone(),
            key: DEPENDENCIES.to_string(),
            expected: "a list of mod ids",
        })
    }

    /// Whether a file has been published for `version`.
    pub fn publishes(&self, version: &GameVersion) -> bool {
        self.attributes.get(LINK, Some(version)).is_some()
    }

    /// Append dependencies, skipping ones already listed.
    ///
    /// With a version whose mapping has no own dependency list yet, a new
    /// empty override is started rather than copying the general list.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing dependency list is missing or
    /// malformed.
    pub fn add_dependencies(&mut self, deps: &[ModId], version: Option<&GameVersion>) -> Result<()> {
        let mut current = match version {
            Some(v) if self.attributes.get_override(DEPENDENCIES, v).is_none() => Vec::new(),
            _ => self.dependencies(version)?,
        };
        for dep in deps {
            if !current.contains(dep) {
                current.push(dep.clone());
            }
        }

        let list = current.iter().map(|d| Value::from(d.as_str())).collect();
        self.set(DEPENDENCIES, Value::Array(list), version);
        Ok(())
    }

    /// Store `source` as the file for `version` and persist.
    ///
    /// Records `jar` (the source's file name) and `link` (`<version>.jar`),
    /// moves the file into storage, replaces whatever occupies the link
    /// path (dangling links included), links it to the jar and writes the
    /// metadata.
    ///
    /// An I/O failure part way through can leave the file moved without
    /// updated metadata on disk; re-invoking with the stored file recovers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAFile`] if `source` has no file name,
    /// [`Error::FileNameClash`] if it is named like the metadata file or a
    /// version link, [`Error::ArchiveInUse`] if another version already
    /// stores a file of that name, and [`Error::Io`] for filesystem failures.
    pub fn set_file(&mut self, source: &Path, version: &GameVersion) -> Result<()> {
        let jar_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::NotAFile {
                path: source.to_path_buf(),
            })?
            .to_string();
        let link_name = format!("{version}.jar");
        let is_link_name = jar_name
            .strip_suffix(".jar")
            .is_some_and(|stem| valid_version(stem).is_ok());
        if jar_name == MOD_FILE || is_link_name {
            return Err(Error::FileNameClash { name: jar_name });
        }
        if let Some(other) = self.attributes.versions().find(|v| {
            *v != version
                && self
                    .attributes
                    .get_override(JAR, v)
                    .and_then(Value::as_str)
                    == Some(jar_name.as_str())
        }) {
            return Err(Error::ArchiveInUse {
                name: jar_name,
                version: other.clone(),
            });
        }

        self.set(JAR, Value::from(jar_name.as_str()), Some(version));
        self.set(LINK, Value::from(link_name.as_str()), Some(version));

        let jar = self.dir.join(&jar_name);
        let link = self.dir.join(&link_name);

        fs::move_file(source, &jar)?;
        if fs::exists_or_dangling(&link) {
            fs::remove(&link)?;
        }
        // Relative target: link and jar share a directory.
        fs::symlink(Path::new(&jar_name), &link)?;

        self.write()?;
        info!("Stored {jar_name} as {} for {version}", self.id);
        Ok(())
    }

    /// Persist all attributes to the metadata file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<()> {
        fs::write_json(&self.dir.join(MOD_FILE), &self.attributes, self.json)
    }
}

impl std::fmt::Display for Mod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
