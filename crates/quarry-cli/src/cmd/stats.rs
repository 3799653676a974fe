//! Stats command

use std::path::PathBuf;

use anyhow::Result;
use quarry_core::StatKind;

/// Print the repository's aggregate statistics.
pub fn stats(repo: Option<PathBuf>) -> Result<()> {
    let repo = super::open_repository(repo)?;

    println!("Repository: {} [{}]", repo.name(), repo.url());
    println!("  Packages:        {}", repo.stat(StatKind::RemoteCount));
    println!("  Unique packages: {}", repo.stat(StatKind::RemoteUnique));
    println!("  Total size:      {} bytes", repo.stat(StatKind::RemoteSize));
    Ok(())
}
