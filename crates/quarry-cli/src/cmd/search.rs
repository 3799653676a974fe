//! Search and query commands

use std::path::PathBuf;

use anyhow::Result;
use quarry_core::{LoadFlags, RepoIterator};

use crate::{FieldArg, MatchArg};

/// Field search with sort.
pub fn search(
    repo: Option<PathBuf>,
    pattern: &str,
    mode: MatchArg,
    field: FieldArg,
    sort: FieldArg,
) -> Result<()> {
    let repo = super::open_repository(repo)?;
    let mut it = repo.search(pattern, mode.into(), field.into(), sort.into())?;

    let mut count = 0usize;
    while let Some(pkg) = it.next(LoadFlags::NONE)? {
        println!("{:<30} {}", format!("{}-{}", pkg.name, pkg.version), pkg.comment);
        count += 1;
    }
    print_summary(count);
    Ok(())
}

/// Name/name-version match via the condition query shape.
pub fn query(repo: Option<PathBuf>, pattern: &str, mode: MatchArg) -> Result<()> {
    let repo = super::open_repository(repo)?;
    let mut it = repo.query(pattern, None, mode.into())?;

    let mut count = 0usize;
    while let Some(pkg) = it.next(LoadFlags::NONE)? {
        println!("{:<30} {}", format!("{}-{}", pkg.name, pkg.version), pkg.origin);
        count += 1;
    }
    print_summary(count);
    Ok(())
}

fn print_summary(count: usize) {
    if count == 0 {
        println!("No packages matched");
    } else {
        println!("{count} package(s) matched");
    }
}
