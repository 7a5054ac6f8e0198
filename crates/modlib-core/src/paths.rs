//! Well-known file locations.

use std::path::{Path, PathBuf};

/// Name of a mod's metadata file inside its storage directory.
pub const MOD_FILE: &str = "mod.json";

/// Per-user configuration file: `<config_dir>/modlib/config.toml`.
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("modlib").join("config.toml"))
}

/// Configuration file in the working directory: `./.modlib.toml`.
pub fn local_config_file() -> PathBuf {
    PathBuf::from(".modlib.toml")
}

/// Configuration sources in increasing order of precedence.
///
/// `MODLIB_CONFIG`, if set, names one extra file read last.
pub fn config_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = user_config_file().into_iter().collect();
    files.push(local_config_file());
    if let Ok(val) = std::env::var("MODLIB_CONFIG") {
        files.push(PathBuf::from(val));
    }
    files
}

/// Make `path` absolute against the working directory without touching the
/// filesystem. Symlink targets are built from these, so relative paths would
/// break as soon as the link lives elsewhere.
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined.
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Extract the filename from a URL, ignoring any query string or fragment.
///
/// # Example
///
/// ```
/// use modlib_core::paths::filename_from_url;
///
/// assert_eq!(filename_from_url("https://example.com/files/jei-4.16.jar?x=1"), "jei-4.16.jar");
/// assert_eq!(filename_from_url(""), "");
/// ```
pub fn filename_from_url(url: &str) -> &str {
    let url = url.split(['?', '#']).next().unwrap_or("");
    url.split('/').next_back().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://host/a/b/mod.jar"), "mod.jar");
        assert_eq!(filename_from_url("https://host/a/b/"), "");
        assert_eq!(filename_from_url("mod.jar#frag"), "mod.jar");
    }

    #[test]
    fn test_absolute_keeps_absolute_paths() {
        let abs = absolute(Path::new("/tmp/storage")).unwrap();
        assert_eq!(abs, PathBuf::from("/tmp/storage"));
        assert!(absolute(Path::new("storage")).unwrap().is_absolute());
    }
}
