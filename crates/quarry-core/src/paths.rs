//! Default on-disk locations

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the primary quarry directory, or None if the user's home
/// cannot be resolved.
pub fn try_quarry_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("QUARRY_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".quarry"))
}

/// Returns the canonical quarry home directory (`~/.quarry`).
///
/// # Panics
///
/// Panics if neither `QUARRY_HOME` is set nor the user's home directory
/// can be resolved.
pub fn quarry_home() -> PathBuf {
    try_quarry_home().expect("Could not determine home directory. Set QUARRY_HOME to override.")
}

/// Repository definitions directory: ~/.quarry/repos.d
pub fn repo_conf_dir() -> PathBuf {
    quarry_home().join("repos.d")
}

/// Definition file for a named repository: ~/.quarry/repos.d/<name>.toml
pub fn repo_conf_path(name: &str) -> PathBuf {
    repo_conf_dir().join(format!("{name}.toml"))
}

/// The definition consulted when no repository is named explicitly.
pub fn default_repo_conf() -> PathBuf {
    repo_conf_path("default")
}
