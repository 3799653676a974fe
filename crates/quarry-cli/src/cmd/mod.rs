//! Subcommand implementations

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use quarry_core::{RepoConfig, Repository, paths};

pub mod groups;
pub mod search;
pub mod show;
pub mod stats;
pub mod which;

/// Load the repository definition and open the repository.
pub(crate) fn open_repository(repo: Option<PathBuf>) -> Result<Repository> {
    let path = repo.unwrap_or_else(paths::default_repo_conf);
    let config = RepoConfig::from_file(&path)
        .with_context(|| format!("Failed to load repository definition {}", path.display()))?;
    if !config.enabled {
        bail!("repository '{}' is disabled", config.name);
    }
    Repository::open(&config)
        .with_context(|| format!("Failed to open repository '{}'", config.name))
}
