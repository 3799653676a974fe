//! Repository handle and its public operations
//!
//! A [`Repository`] owns the connection to its SQLite package index and
//! knows its local content directory. Every query/search operation
//! compiles to parameterized SQL and comes back as an index-backed
//! iterator; group operations bypass the index and come back as a
//! virtual-group iterator, or `None` when nothing matched. The caller
//! owns the repository across the lifetime of every iterator it
//! produces, which the borrow on [`IndexIter`] enforces.

use std::path::{Path, PathBuf};

use regex::Regex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params};

use crate::cache::{self, ArchiveManifest};
use crate::config::RepoConfig;
use crate::error::RepoError;
use crate::groups;
use crate::iter::{self, GroupIter, IndexIter, IterMode};
use crate::matching::{CaseSensitivity, MatchMode, SearchField};
use crate::query;
use crate::record::{LoadFlags, PackageFile, PackageRecord, Provenance};
use crate::stats::{self, StatKind};

/// Index database file inside a repository content directory.
const INDEX_FILE: &str = "index.sqlite";

/// Fetch cache directory inside a repository content directory.
const CACHE_DIR: &str = "cache";

/// An open repository.
#[derive(Debug)]
pub struct Repository {
    name: String,
    url: String,
    root: PathBuf,
    case: CaseSensitivity,
    db: Connection,
}

/// Make the `REGEXP` operator available on an index connection.
///
/// The compiled pattern is cached per statement via the function's
/// auxiliary-data slot, so a query re-compiles it once, not per row.
/// NULL or non-text values never match.
fn register_regexp(db: &Connection) -> rusqlite::Result<()> {
    use rusqlite::functions::FunctionFlags;

    db.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: std::sync::Arc<Regex> = ctx.get_or_create_aux(
                0,
                |vr| -> Result<_, Box<dyn std::error::Error + Send + Sync + 'static>> {
                    Ok(Regex::new(vr.as_str()?)?)
                },
            )?;
            let haystack = match ctx.get_raw(1) {
                ValueRef::Text(text) => std::str::from_utf8(text)
                    .map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err)))?,
                _ => return Ok(false),
            };
            Ok(regex.is_match(haystack))
        },
    )
}

/// Reject an empty pattern for every mode but `All`.
fn check_pattern(pattern: &str, mode: MatchMode) -> Result<(), RepoError> {
    if mode != MatchMode::All && pattern.is_empty() {
        return Err(RepoError::InvalidArgument(
            "empty pattern requires the match-all mode".to_string(),
        ));
    }
    Ok(())
}

impl Repository {
    /// Open a repository from its definition: connect to the index
    /// read-only and register the `REGEXP` operator.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Backend`] when the index database cannot be
    /// opened.
    pub fn open(config: &RepoConfig) -> Result<Self, RepoError> {
        let index = config.root.join(INDEX_FILE);
        let db = Connection::open_with_flags(
            &index,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        register_regexp(&db)?;
        tracing::debug!(name = %config.name, index = %index.display(), "opened repository index");
        Ok(Self {
            name: config.name.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            case: config.case_sensitivity(),
            db,
        })
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Local content directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The case-sensitivity rule this repository matches under.
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    /// Close the repository, releasing the index connection.
    ///
    /// Dropping the repository has the same effect; this form surfaces
    /// the backend's close status.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Backend`] when the index connection fails to
    /// close cleanly.
    pub fn close(self) -> Result<(), RepoError> {
        self.db.close().map_err(|(_, err)| err.into())
    }

    /// Compile and run a query, draining its rows into an iterator.
    fn run_query(
        &self,
        sql: &str,
        pattern: &str,
        mode: IterMode,
    ) -> Result<IndexIter<'_>, RepoError> {
        tracing::debug!(sql, "compiled repository query");
        let mut stmt = self.db.prepare(sql)?;
        let mut records = Vec::new();
        let mut rows = if stmt.parameter_count() == 0 {
            stmt.query([])?
        } else {
            stmt.query(params![pattern])?
        };
        while let Some(row) = rows.next()? {
            records.push(iter::hydrate_row(row)?);
        }
        drop(rows);
        Ok(IndexIter::new(self, records, mode))
    }

    /// Free-text/condition search: match `pattern` against name or
    /// `name-version`, optionally ANDed with a caller-supplied condition
    /// fragment.
    ///
    /// The fragment is a trust boundary: it is spliced into the query
    /// text and must originate from validated internal logic, never from
    /// untrusted input.
    ///
    /// # Errors
    ///
    /// [`RepoError::InvalidArgument`] for an empty pattern outside
    /// [`MatchMode::All`] or a malformed fragment;
    /// [`RepoError::Backend`] when compilation or execution fails.
    pub fn query(
        &self,
        pattern: &str,
        cond: Option<&str>,
        mode: MatchMode,
    ) -> Result<IndexIter<'_>, RepoError> {
        check_pattern(pattern, mode)?;
        let sql = query::condition_query_sql(&self.name, &self.url, cond, mode, self.case)?;
        self.run_query(&sql, pattern, IterMode::OneShot)
    }

    /// Field search with sort, as a one-shot iterator.
    ///
    /// # Errors
    ///
    /// [`RepoError::InvalidArgument`] for an empty pattern outside
    /// [`MatchMode::All`]; [`RepoError::Backend`] when compilation or
    /// execution fails.
    pub fn search(
        &self,
        pattern: &str,
        mode: MatchMode,
        field: SearchField,
        sort: SearchField,
    ) -> Result<IndexIter<'_>, RepoError> {
        self.search_with(pattern, mode, field, sort, IterMode::OneShot)
    }

    /// Field search with sort and an explicit iterator mode; pass
    /// [`IterMode::Resettable`] to create a re-executable result set.
    ///
    /// # Errors
    ///
    /// As for [`Repository::search`].
    pub fn search_with(
        &self,
        pattern: &str,
        mode: MatchMode,
        field: SearchField,
        sort: SearchField,
        iter_mode: IterMode,
    ) -> Result<IndexIter<'_>, RepoError> {
        check_pattern(pattern, mode)?;
        let sql = query::search_sql(&self.name, &self.url, mode, field, sort, self.case);
        self.run_query(&sql, pattern, iter_mode)
    }

    /// Packages declaring a generic provide named `capability`.
    ///
    /// # Errors
    ///
    /// [`RepoError::Backend`] when compilation or execution fails.
    pub fn provide(&self, capability: &str) -> Result<IndexIter<'_>, RepoError> {
        let sql = query::provide_sql(&self.name, &self.url);
        self.run_query(&sql, capability, IterMode::OneShot)
    }

    /// Packages declaring a generic require named `capability`.
    ///
    /// # Errors
    ///
    /// [`RepoError::Backend`] when compilation or execution fails.
    pub fn require(&self, capability: &str) -> Result<IndexIter<'_>, RepoError> {
        let sql = query::require_sql(&self.name, &self.url);
        self.run_query(&sql, capability, IterMode::OneShot)
    }

    /// Packages providing the shared library `soname`, tolerating
    /// version-suffixed names sharing its prefix.
    ///
    /// # Errors
    ///
    /// [`RepoError::Backend`] when compilation or execution fails.
    pub fn shlib_provide(&self, soname: &str) -> Result<IndexIter<'_>, RepoError> {
        let sql = query::shlib_provide_sql(&self.name, &self.url);
        self.run_query(&sql, soname, IterMode::OneShot)
    }

    /// Packages requiring exactly the shared library `soname`.
    ///
    /// # Errors
    ///
    /// [`RepoError::Backend`] when compilation or execution fails.
    pub fn shlib_require(&self, soname: &str) -> Result<IndexIter<'_>, RepoError> {
        let sql = query::shlib_require_sql(&self.name, &self.url);
        self.run_query(&sql, soname, IterMode::OneShot)
    }

    /// Group search over the name field.
    ///
    /// # Errors
    ///
    /// As for [`Repository::group_search`].
    pub fn group_query(
        &self,
        pattern: &str,
        mode: MatchMode,
    ) -> Result<Option<GroupIter>, RepoError> {
        self.group_search(pattern, mode, SearchField::Name)
    }

    /// Search the repository's group document.
    ///
    /// Returns `Ok(None)` when the repository ships no group document or
    /// nothing matched; `Ok(Some(_))` yields the matches in document
    /// order as virtual package records.
    ///
    /// # Errors
    ///
    /// [`RepoError::Unsupported`] for fields other than `Name` and
    /// `Comment` (checked before the document is touched);
    /// [`RepoError::InvalidArgument`] for an empty pattern outside
    /// [`MatchMode::All`]; [`RepoError::Io`] when the content directory
    /// is unavailable; [`RepoError::Parse`] for a malformed document;
    /// [`RepoError::Pattern`] when a regex pattern fails to compile.
    pub fn group_search(
        &self,
        pattern: &str,
        mode: MatchMode,
        field: SearchField,
    ) -> Result<Option<GroupIter>, RepoError> {
        let in_comment = match field {
            SearchField::Name => false,
            SearchField::Comment => true,
            other => {
                return Err(RepoError::Unsupported(format!(
                    "group search cannot match on {other:?}"
                )));
            }
        };
        check_pattern(pattern, mode)?;

        let dir = self.content_dir()?;
        let Some(entries) = groups::load_entries(&dir.join(groups::GROUPS_FILE))? else {
            return Ok(None);
        };
        let matched = groups::filter_entries(entries, pattern, mode, in_comment, self.case)?;
        if matched.is_empty() {
            return Ok(None);
        }
        Ok(Some(GroupIter::new(self.name.clone(), matched)))
    }

    /// The deterministic cache path for a package's fetched archive.
    pub fn cached_path(&self, pkg: &PackageRecord) -> PathBuf {
        let file = if pkg.cksum.is_empty() {
            format!("{}-{}.pkg", pkg.name, pkg.version)
        } else {
            let short = pkg.cksum.get(..16).unwrap_or(&pkg.cksum);
            format!("{}-{}~{short}.pkg", pkg.name, pkg.version)
        };
        self.root.join(CACHE_DIR).join(file)
    }

    /// Hydrate a record's deferred file, directory, and config-file
    /// lists from its cached archive.
    ///
    /// A record that already carries everything requested is a no-op
    /// success, without touching the cache. The lists are moved out of
    /// the archive manifest into the record, never duplicated.
    ///
    /// # Errors
    ///
    /// [`RepoError::Unsupported`] for records with
    /// [`Provenance::Installed`] -- those are hydrated from the install
    /// database by a different collaborator, unconditionally not from
    /// the repository cache. [`RepoError::Io`] when the cached archive
    /// is absent or unreadable; [`RepoError::Parse`] /
    /// [`RepoError::NoManifest`] when its metadata is malformed.
    pub fn ensure_loaded(
        &self,
        pkg: &mut PackageRecord,
        flags: LoadFlags,
    ) -> Result<(), RepoError> {
        let wanted = flags & (LoadFlags::FILES | LoadFlags::DIRS | LoadFlags::CONFIG_FILES);
        if pkg.loaded.contains(wanted) {
            return Ok(());
        }
        if pkg.provenance == Provenance::Installed {
            return Err(RepoError::Unsupported(format!(
                "cached package {}-{}: installed packages are hydrated from the install database",
                pkg.name, pkg.version
            )));
        }

        let path = self.cached_path(pkg);
        tracing::debug!(archive = %path.display(), "loading cached package archive");
        let ArchiveManifest {
            files,
            config,
            directories,
        } = cache::read_manifest(&path)?;

        pkg.files = Some(
            files
                .into_iter()
                .map(|f| PackageFile {
                    path: f.path,
                    checksum: f.sum,
                })
                .collect(),
        );
        pkg.config_files = Some(config);
        pkg.dirs = Some(directories);
        pkg.loaded |= wanted;
        Ok(())
    }

    /// Compute a repository statistic. Never fails: kinds computed
    /// elsewhere, missing statements, and empty aggregates all report
    /// zero.
    pub fn stat(&self, kind: StatKind) -> i64 {
        stats::run(&self.db, kind)
    }

    /// Populate a record's annotation map from the index.
    pub(crate) fn load_annotations(&self, pkg: &mut PackageRecord) -> Result<(), RepoError> {
        let mut stmt = self.db.prepare(
            "SELECT tag.annotation, value.annotation FROM pkg_annotation \
             JOIN annotation tag ON pkg_annotation.tag_id = tag.annotation_id \
             JOIN annotation value ON pkg_annotation.value_id = value.annotation_id \
             WHERE pkg_annotation.package_id = ?1;",
        )?;
        let mut rows = stmt.query(params![pkg.id])?;
        while let Some(row) = rows.next()? {
            let tag: Option<String> = row.get(0)?;
            let value: Option<String> = row.get(1)?;
            if let (Some(tag), Some(value)) = (tag, value) {
                pkg.annotations.insert(tag, value);
            }
        }
        pkg.loaded |= LoadFlags::ANNOTATIONS;
        Ok(())
    }

    /// The content directory, validated on demand.
    fn content_dir(&self) -> Result<&Path, RepoError> {
        if self.root.is_dir() {
            Ok(&self.root)
        } else {
            Err(RepoError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "repository content directory {} is not available",
                    self.root.display()
                ),
            )))
        }
    }
}
