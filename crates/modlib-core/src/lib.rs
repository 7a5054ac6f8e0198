//! Core library for modlib.
//!
//! Manages a local storage of versioned mods and packs that reference a
//! subset of them for one target version.
//!
//! # Storage Layout
//!
//! ```text
//! storage/
//! └── <mod-id>/
//!     ├── mod.json        # attributes (general + per-version)
//!     ├── <archive>.jar   # stored files
//!     └── <version>.jar   # stable link to the archive for that version
//! packs/
//! └── <pack>              # pack file (version, directory, membership)
//! ```
//!
//! A pack's `directory` receives one `<name>.jar` per member, either as a
//! symlink to the mod's version link or as a copy of the archive.

pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod mods;
pub mod pack;
pub mod paths;
pub mod registry;

pub use config::Config;
pub use error::{Error, Result};
pub use mods::Mod;
pub use pack::{Pack, Repair, list_packs};
pub use registry::ModRegistry;

pub use modlib_schema::{GameVersion, Membership, ModId, PackManifest, valid_version};

/// User Agent string for network requests
pub const USER_AGENT: &str = concat!("modlib/", env!("CARGO_PKG_VERSION"));
