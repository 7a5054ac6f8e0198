//! Shared types and on-disk metadata formats for modlib.
//!
//! Everything here is pure data: no filesystem access, no logging. The
//! engine in `modlib-core` builds on these types.

pub mod attributes;
pub mod pack;
pub mod types;
pub mod version;

// Re-exports
pub use attributes::{AttributeMap, Attributes};
pub use pack::{Membership, PackManifest};
pub use types::*;
pub use version::{GameVersion, valid_version};

/// Attribute key holding the list of mod ids a mod depends on.
pub const DEPENDENCIES: &str = "dependencies";

/// Attribute key holding the display name, also used for the file name inside packs.
pub const NAME: &str = "name";

/// Per-version attribute key naming the stored archive file.
pub const JAR: &str = "jar";

/// Per-version attribute key naming the stable link to the archive.
pub const LINK: &str = "link";

/// Per-version attribute key recording where the stored archive was downloaded from.
pub const URL: &str = "url";
