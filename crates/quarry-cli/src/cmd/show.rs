//! Show command

use std::path::PathBuf;

use anyhow::Result;
use quarry_core::{LoadFlags, MatchMode, RepoIterator, SearchField};

/// Exact-name lookup printing full metadata plus the packaged file and
/// directory lists hydrated from the fetch cache.
pub fn show(repo: Option<PathBuf>, name: &str) -> Result<()> {
    let repo = super::open_repository(repo)?;
    let mut it = repo.search(name, MatchMode::Exact, SearchField::Name, SearchField::None)?;

    let Some(mut pkg) = it.next(LoadFlags::ANNOTATIONS)? else {
        println!("No package named '{name}'");
        return Ok(());
    };

    println!("name:       {}", pkg.name);
    println!("version:    {}", pkg.version);
    println!("origin:     {}", pkg.origin);
    println!("comment:    {}", pkg.comment);
    println!("arch:       {}", pkg.arch);
    println!("maintainer: {}", pkg.maintainer);
    println!("www:        {}", pkg.www);
    println!("prefix:     {}", pkg.prefix);
    println!("repository: {} [{}]", pkg.reponame, pkg.repourl);
    println!("pkgsize:    {}", pkg.pkgsize);
    println!("flatsize:   {}", pkg.flatsize);
    for (tag, value) in &pkg.annotations {
        println!("annotation: {tag} = {value}");
    }

    let wanted = LoadFlags::FILES | LoadFlags::DIRS | LoadFlags::CONFIG_FILES;
    match repo.ensure_loaded(&mut pkg, wanted) {
        Ok(()) => {
            for file in pkg.files.as_deref().unwrap_or_default() {
                println!("file:       {}", file.path);
            }
            for dir in pkg.dirs.as_deref().unwrap_or_default() {
                println!("dir:        {dir}");
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "package archive not cached");
            println!("files:      (not cached locally)");
        }
    }
    Ok(())
}
