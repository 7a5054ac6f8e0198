//! Domain-specific errors for mod and pack operations

use crate::download::DownloadError;
use modlib_schema::{GameVersion, ModId, SchemaError};
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong in the core.
///
/// Structural errors (everything except `Io`, `Json`, `Config` and
/// `Download`) are raised before any state is touched.
#[derive(Error, Debug)]
pub enum Error {
    /// A version string failed format validation.
    #[error("invalid version: '{0}' (expected major.minor.patch)")]
    InvalidVersion(String),

    /// A string cannot be used as a mod id.
    #[error("invalid mod id '{id}': {reason}")]
    InvalidModId {
        /// The rejected id.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The key is set neither for the requested version nor in general.
    #[error("{id} has no attribute '{key}'")]
    AttributeNotFound {
        /// Mod that was queried.
        id: ModId,
        /// Missing key.
        key: String,
    },

    /// The attribute exists but has an unexpected JSON shape.
    #[error("attribute '{key}' of {id} is not {expected}")]
    AttributeType {
        /// Mod that was queried.
        id: ModId,
        /// Offending key.
        key: String,
        /// Human readable description of the expected shape.
        expected: &'static str,
    },

    /// No metadata for this id exists in storage.
    #[error("mod {id} is not in storage")]
    UnknownMod {
        /// The requested id.
        id: ModId,
    },

    /// `new_mod` was called for an id that is already taken.
    #[error("mod {id} already exists")]
    ModExists {
        /// The taken id.
        id: ModId,
    },

    /// The source file for `set_file` would replace the metadata file or a
    /// version link.
    #[error("file name '{name}' is reserved in mod storage")]
    FileNameClash {
        /// The colliding file name.
        name: String,
    },

    /// Another version already stores an archive under this file name.
    #[error("'{name}' is already stored for version {version}")]
    ArchiveInUse {
        /// The stored file name.
        name: String,
        /// Version whose archive it is.
        version: GameVersion,
    },

    /// The source path for `set_file` has no file name component.
    #[error("'{}' does not name a file", .path.display())]
    NotAFile {
        /// The rejected path.
        path: PathBuf,
    },

    /// The mod publishes no file for the pack's version.
    #[error("{id} is not available for version {version}")]
    VersionMismatch {
        /// The mod that was added.
        id: ModId,
        /// The pack's version.
        version: GameVersion,
    },

    /// Dependency traversal reached a mod that is still being added.
    #[error("circular dependency: {}", format_chain(.chain))]
    DependencyCycle {
        /// Path from the first mod on the cycle back to itself.
        chain: Vec<ModId>,
    },

    /// The mod is not a member of the pack.
    #[error("{id} is not in the pack")]
    NotInPack {
        /// The requested id.
        id: ModId,
    },

    /// Other members still depend on the mod.
    #[error("{id} is still required by {}", format_chain_sep(.dependants, ", "))]
    HasDependants {
        /// The mod that was to be removed.
        id: ModId,
        /// Members that depend on it.
        dependants: Vec<ModId>,
    },

    /// No pack file under this name or path.
    #[error("pack '{name}' not found")]
    PackNotFound {
        /// Name or path that was looked up.
        name: String,
    },

    /// A pack file already exists where a new one was to be created.
    #[error("pack file {} already exists", .path.display())]
    PackExists {
        /// Location of the existing file.
        path: PathBuf,
    },

    /// Filesystem failure, with the path it happened on.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Path being operated on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A metadata file could not be parsed or serialized.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        /// The metadata file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// A download failed.
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),
}

impl Error {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a path to a JSON error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidVersion(v) => Self::InvalidVersion(v),
            SchemaError::InvalidModId(id, reason) => Self::InvalidModId { id, reason },
        }
    }
}

fn format_chain(chain: &[ModId]) -> String {
    format_chain_sep(chain, " -> ")
}

fn format_chain_sep(ids: &[ModId], sep: &str) -> String {
    ids.iter().map(ModId::as_str).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ModId {
        ModId::new(s).unwrap()
    }

    #[test]
    fn test_cycle_message_shows_chain() {
        let err = Error::DependencyCycle {
            chain: vec![id("a"), id("b"), id("a")],
        };
        assert_eq!(err.to_string(), "circular dependency: a -> b -> a");
    }

    #[test]
    fn test_has_dependants_message() {
        let err = Error::HasDependants {
            id: id("lib"),
            dependants: vec![id("x"), id("y")],
        };
        assert_eq!(err.to_string(), "lib is still required by x, y");
    }

    #[test]
    fn test_schema_errors_convert() {
        let err: Error = SchemaError::InvalidVersion("1.2".into()).into();
        assert!(matches!(err, Error::InvalidVersion(v) if v == "1.2"));
    }
}
