//! Layered TOML configuration.
//!
//! Defaults are overridden key by key by each file from
//! [`paths::config_files`](crate::paths::config_files) that exists:
//!
//! ```toml
//! [mods]
//! directory = "./storage"
//!
//! [packs]
//! directory = "./packs"
//! use_symlinks = true
//!
//! [json]
//! compact = false
//! ```

use crate::error::{Error, Result};
use crate::fs::Materialization;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mod storage settings.
    pub mods: ModsConfig,
    /// Pack settings.
    pub packs: PacksConfig,
    /// Metadata file formatting.
    pub json: JsonConfig,
}

/// `[mods]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModsConfig {
    /// Root directory holding one directory per mod.
    pub directory: PathBuf,
}

impl Default for ModsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./storage"),
        }
    }
}

/// `[packs]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacksConfig {
    /// Directory where pack files are looked up and created.
    pub directory: PathBuf,
    /// Symlink member files into pack directories instead of copying them.
    pub use_symlinks: bool,
}

impl Default for PacksConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./packs"),
            use_symlinks: true,
        }
    }
}

/// `[json]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Write metadata on a single line instead of indented.
    pub compact: bool,
}

impl Config {
    /// Load the configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_files())
    }

    /// Load the configuration from `files`, later files taking precedence.
    /// Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a file exists but cannot be read, or
    /// [`Error::Config`] if it is not valid TOML of the expected shape.
    pub fn load_from(files: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Table::new();
        let mut last = None;

        for path in files {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io(path, e)),
            };
            debug!("Reading config file {}", path.display());

            let config_error = |source| Error::Config {
                path: path.clone(),
                source,
            };
            // Type-check the file on its own so errors point at it.
            toml::from_str::<Config>(&text).map_err(config_error)?;
            let table: toml::Table = toml::from_str(&text).map_err(config_error)?;

            merge(&mut merged, table);
            last = Some(path);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|source| Error::Config {
                path: last.cloned().unwrap_or_default(),
                source,
            })
    }

    /// How pack members are materialized.
    pub fn materialization(&self) -> Materialization {
        if self.packs.use_symlinks {
            Materialization::Symlink
        } else {
            Materialization::Copy
        }
    }

    /// Mod storage root.
    pub fn storage_dir(&self) -> &Path {
        &self.mods.directory
    }

    /// Pack file directory.
    pub fn packs_dir(&self) -> &Path {
        &self.packs.directory
    }
}

/// Recursively overlay `overlay` onto `base`.
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
