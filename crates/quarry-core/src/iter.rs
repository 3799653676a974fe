//! Pull iterators over repository results
//!
//! One trait, two backends: index-backed iteration over rows produced by
//! a compiled query, and virtual-group iteration over filtered group
//! entries. Dropping an iterator closes it; that is safe at any point --
//! before the first `next`, mid-stream, or after exhaustion.

use rusqlite::Row;

use crate::error::RepoError;
use crate::groups::GroupEntry;
use crate::record::{LoadFlags, PackageRecord, Provenance};
use crate::repo::Repository;

/// A pull iterator of package records.
pub trait RepoIterator {
    /// Yield the next matching record, hydrating the parts named by
    /// `flags` where the backend can. Returns `Ok(None)` once the
    /// iterator is exhausted; every matching record is yielded at most
    /// once per pass.
    fn next(&mut self, flags: LoadFlags) -> Result<Option<PackageRecord>, RepoError>;

    /// Rewind to the initial state where supported; a subsequent drain
    /// yields the same ordered sequence again.
    ///
    /// # Errors
    ///
    /// [`RepoError::Unsupported`] for one-shot iterators.
    fn reset(&mut self) -> Result<(), RepoError>;
}

/// Whether an index-backed iterator can be rewound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterMode {
    /// Single consumption; `reset` is unsupported.
    OneShot,
    /// The result set can be replayed from the start via `reset`.
    Resettable,
}

/// Pull a text column that may be NULL, defaulting to empty.
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

/// Pull an integer column that may be NULL, defaulting to zero.
fn integer(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or_default())
}

/// Hydrate a remote package record from one result row.
///
/// Column order is fixed by the query builder: id, origin, name,
/// uniqueid, version, comment, prefix, desc, arch, maintainer, www,
/// licenselogic, flatsize, pkgsize, cksum, manifestdigest, repopath,
/// dbname, repourl.
pub(crate) fn hydrate_row(row: &Row<'_>) -> rusqlite::Result<PackageRecord> {
    let mut pkg = PackageRecord::new(Provenance::Remote);
    pkg.id = integer(row, 0)?;
    pkg.origin = text(row, 1)?;
    pkg.name = text(row, 2)?;
    pkg.uniqueid = text(row, 3)?;
    pkg.version = text(row, 4)?;
    pkg.comment = text(row, 5)?;
    pkg.prefix = text(row, 6)?;
    pkg.desc = text(row, 7)?;
    pkg.arch = text(row, 8)?;
    pkg.maintainer = text(row, 9)?;
    pkg.www = text(row, 10)?;
    pkg.licenselogic = integer(row, 11)?;
    pkg.flatsize = integer(row, 12)?;
    pkg.pkgsize = integer(row, 13)?;
    pkg.cksum = text(row, 14)?;
    pkg.manifestdigest = text(row, 15)?;
    pkg.repopath = text(row, 16)?;
    pkg.reponame = text(row, 17)?;
    pkg.repourl = text(row, 18)?;
    Ok(pkg)
}

/// Iterator over records produced by a compiled index query.
///
/// The statement's rows are drained into an owned sequence when the
/// iterator is built (safe Rust cannot hold a live cursor alongside its
/// statement); the pull contract is unchanged. Annotation hydration
/// still happens per record at yield time, against the live index
/// handle.
#[derive(Debug)]
pub struct IndexIter<'repo> {
    repo: &'repo Repository,
    records: Vec<PackageRecord>,
    cursor: usize,
    mode: IterMode,
}

impl<'repo> IndexIter<'repo> {
    pub(crate) fn new(repo: &'repo Repository, records: Vec<PackageRecord>, mode: IterMode) -> Self {
        Self {
            repo,
            records,
            cursor: 0,
            mode,
        }
    }
}

impl RepoIterator for IndexIter<'_> {
    fn next(&mut self, flags: LoadFlags) -> Result<Option<PackageRecord>, RepoError> {
        let Some(record) = self.records.get(self.cursor) else {
            return Ok(None);
        };
        let mut record = record.clone();
        self.cursor += 1;

        if flags.contains(LoadFlags::ANNOTATIONS) && !record.loaded.contains(LoadFlags::ANNOTATIONS)
        {
            self.repo.load_annotations(&mut record)?;
        }
        Ok(Some(record))
    }

    fn reset(&mut self) -> Result<(), RepoError> {
        match self.mode {
            IterMode::OneShot => Err(RepoError::Unsupported(
                "one-shot iterator cannot be reset".to_string(),
            )),
            IterMode::Resettable => {
                self.cursor = 0;
                Ok(())
            }
        }
    }
}

/// Iterator synthesizing virtual package records from filtered group
/// entries.
#[derive(Debug)]
pub struct GroupIter {
    reponame: String,
    entries: Vec<GroupEntry>,
    cursor: usize,
}

impl GroupIter {
    pub(crate) fn new(reponame: String, entries: Vec<GroupEntry>) -> Self {
        Self {
            reponame,
            entries,
            cursor: 0,
        }
    }
}

impl RepoIterator for GroupIter {
    /// Virtual packages carry no loadable lists, so `flags` is ignored.
    fn next(&mut self, _flags: LoadFlags) -> Result<Option<PackageRecord>, RepoError> {
        let Some(entry) = self.entries.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;

        let mut pkg = PackageRecord::new(Provenance::GroupVirtual);
        pkg.name = entry.name.clone().unwrap_or_default();
        pkg.uniqueid = format!("@{}", pkg.name);
        pkg.comment = entry.comment.clone().unwrap_or_default();
        pkg.reponame = self.reponame.clone();
        pkg.annotations
            .insert("repository".to_string(), self.reponame.clone());
        Ok(Some(pkg))
    }

    fn reset(&mut self) -> Result<(), RepoError> {
        self.cursor = 0;
        Ok(())
    }
}
