//! Groups command

use std::path::PathBuf;

use anyhow::Result;
use quarry_core::{LoadFlags, RepoIterator, SearchField};

use crate::MatchArg;

/// Search the repository's virtual package groups.
pub fn groups(repo: Option<PathBuf>, pattern: &str, mode: MatchArg, comments: bool) -> Result<()> {
    let repo = super::open_repository(repo)?;
    let field = if comments {
        SearchField::Comment
    } else {
        SearchField::Name
    };

    let Some(mut it) = repo.group_search(pattern, mode.into(), field)? else {
        println!("No groups matched");
        return Ok(());
    };

    while let Some(group) = it.next(LoadFlags::NONE)? {
        println!("{:<20} {}", group.uniqueid, group.comment);
    }
    Ok(())
}
