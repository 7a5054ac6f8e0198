//! Filesystem collaborator: JSON metadata I/O and file materialization.
//!
//! Every failure is reported as [`Error::Io`] / [`Error::Json`] carrying the
//! path it happened on.

use crate::config::JsonConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// How a stored file is made available in a pack directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    /// Symlink to the mod's version link.
    Symlink,
    /// Independent copy of the stored archive.
    Copy,
}

/// Read and parse a JSON metadata file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Json`] if
/// it does not parse as `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::json(path, e))
}

/// Serialize `value` and atomically replace `path` with it.
///
/// The JSON is written to a temporary file in the same directory which is
/// then renamed over the target, so readers see either the old or the new
/// content, never a truncated file.
///
/// # Errors
///
/// Returns [`Error::Json`] if serialization fails and [`Error::Io`] if the
/// temporary file cannot be written or renamed.
pub fn write_json<T: Serialize>(path: &Path, value: &T, style: JsonConfig) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    let serialized = if style.compact {
        serde_json::to_writer(&mut tmp, value)
    } else {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut tmp, formatter);
        value.serialize(&mut ser)
    };
    serialized.map_err(|e| Error::json(path, e))?;

    tmp.write_all(b"\n")
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Whether anything occupies `path`, including a dangling symlink.
///
/// [`Path::exists`] follows symlinks and reports a broken link as absent,
/// which would leave it in place and make the next link creation fail.
pub fn exists_or_dangling(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the link cannot be created, e.g. because
/// something already exists at `link`.
pub fn symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_file(target, link);

    result.map_err(|e| Error::io(link, e))
}

/// Make `source` available at `dest`, as a symlink or a copy.
///
/// # Errors
///
/// Returns [`Error::Io`] if `dest` already exists or the link or copy
/// cannot be created.
pub fn materialize(source: &Path, dest: &Path, how: Materialization) -> Result<()> {
    debug!(
        "Materializing {} -> {} ({how:?})",
        dest.display(),
        source.display()
    );
    match how {
        Materialization::Symlink => symlink(source, dest),
        Materialization::Copy => {
            if exists_or_dangling(dest) {
                return Err(Error::io(
                    dest,
                    std::io::Error::from(std::io::ErrorKind::AlreadyExists),
                ));
            }
            std::fs::copy(source, dest)
                .map(|_| ())
                .map_err(|e| Error::io(dest, e))
        }
    }
}

/// Remove a file or symlink (never the link's target).
///
/// # Errors
///
/// Returns [`Error::Io`] if the removal fails.
pub fn remove(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Move `src` to `dest`, replacing `dest` if it exists.
///
/// Falls back to copy-and-delete when a plain rename is impossible, e.g.
/// across filesystems.
///
/// # Errors
///
/// Returns [`Error::Io`] if `src` does not exist or neither strategy works.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::io(src, e)),
        Err(e) => {
            debug!("Rename of {} failed ({e}), copying instead", src.display());
            let mut options = fs_extra::file::CopyOptions::new();
            options.overwrite = true;
            fs_extra::file::move_file(src, dest, &options)
                .map(|_| ())
                .map_err(|e| Error::io(src, std::io::Error::other(e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_json_is_indented_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mod.json");

        write_json(&path, &json!({"general": {"name": "a"}}), JsonConfig::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"general\""));
        assert!(text.ends_with("}\n"));

        write_json(&path, &json!({"general": {}}), JsonConfig { compact: true }).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"general\":{}}\n");

        // no temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_json_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ nope").unwrap();

        match read_json::<serde_json::Value>(&path) {
            Err(Error::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected JSON error, got {other:?}"),
        }
        match read_json::<serde_json::Value>(&dir.path().join("missing.json")) {
            Err(Error::Io { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected IO error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_present() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("1.12.2.jar");
        symlink(&dir.path().join("gone.jar"), &link).unwrap();

        assert!(!link.exists());
        assert!(exists_or_dangling(&link));
        remove(&link).unwrap();
        assert!(!exists_or_dangling(&link));
    }

    #[cfg(unix)]
    #[test]
    fn test_materialize_symlink_and_copy() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.jar");
        std::fs::write(&source, b"jar").unwrap();

        let linked = dir.path().join("linked.jar");
        materialize(&source, &linked, Materialization::Symlink).unwrap();
        assert!(linked.symlink_metadata().unwrap().is_symlink());
        assert_eq!(std::fs::read_link(&linked).unwrap(), source);

        let copied = dir.path().join("copied.jar");
        materialize(&source, &copied, Materialization::Copy).unwrap();
        assert!(!copied.symlink_metadata().unwrap().is_symlink());
        assert_eq!(std::fs::read(&copied).unwrap(), b"jar");

        assert!(materialize(&source, &copied, Materialization::Copy).is_err());
        assert!(materialize(&source, &linked, Materialization::Symlink).is_err());
    }

    #[test]
    fn test_move_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("download.jar");
        let dest = dir.path().join("stored.jar");
        std::fs::write(&src, b"data").unwrap();

        move_file(&src, &dest).unwrap();
        assert!(!src.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"data");

        assert!(matches!(move_file(&src, &dest), Err(Error::Io { .. })));
    }
}
