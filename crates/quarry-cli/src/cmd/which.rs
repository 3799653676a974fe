//! Capability lookup commands

use std::path::PathBuf;

use anyhow::Result;
use quarry_core::{IndexIter, LoadFlags, RepoIterator};

/// List packages providing a capability or shared library.
pub fn provides(repo: Option<PathBuf>, capability: &str, shlib: bool) -> Result<()> {
    let repo = super::open_repository(repo)?;
    let it = if shlib {
        repo.shlib_provide(capability)?
    } else {
        repo.provide(capability)?
    };
    print_lookup(it, capability)
}

/// List packages requiring a capability or shared library.
pub fn requires(repo: Option<PathBuf>, capability: &str, shlib: bool) -> Result<()> {
    let repo = super::open_repository(repo)?;
    let it = if shlib {
        repo.shlib_require(capability)?
    } else {
        repo.require(capability)?
    };
    print_lookup(it, capability)
}

fn print_lookup(mut it: IndexIter<'_>, capability: &str) -> Result<()> {
    let mut count = 0usize;
    while let Some(pkg) = it.next(LoadFlags::NONE)? {
        println!("{}-{} ({})", pkg.name, pkg.version, pkg.repopath);
        count += 1;
    }
    if count == 0 {
        println!("No packages matched '{capability}'");
    }
    Ok(())
}
