//! Package records yielded by repository iterators
//!
//! A record is transient: one is produced per iteration step, hydrated from
//! index columns or synthesized from a group entry. File and directory
//! lists are deferred and absent until a caller asks for them via
//! `Repository::ensure_loaded`.

use std::collections::BTreeMap;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Origin classification of a package record.
///
/// Provenance gates which operations are valid on a record: only `Remote`
/// records can be hydrated from the repository fetch cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Hydrated from a repository index row.
    Remote,
    /// Hydrated from the local install database (by another collaborator).
    Installed,
    /// Synthesized from a repository group document; never persisted.
    GroupVirtual,
}

/// Bit set of deferred record parts.
///
/// `FILES`, `DIRS`, and `CONFIG_FILES` are satisfied by
/// [`Repository::ensure_loaded`](crate::Repository::ensure_loaded);
/// `ANNOTATIONS` is satisfied during index-backed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadFlags(u8);

impl LoadFlags {
    /// The empty set.
    pub const NONE: Self = Self(0);
    /// The package's file list, with per-file checksums.
    pub const FILES: Self = Self(1);
    /// The package's directory list.
    pub const DIRS: Self = Self(1 << 1);
    /// The subset of files managed as configuration files.
    pub const CONFIG_FILES: Self = Self(1 << 2);
    /// The package's annotation key/value map.
    pub const ANNOTATIONS: Self = Self(1 << 3);

    /// Returns true when every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true when no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LoadFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LoadFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LoadFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// A single packaged file: its installed path and content checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    /// Absolute path the file installs to.
    pub path: String,
    /// Content checksum recorded in the archive manifest.
    pub checksum: String,
}

/// One package, as seen through a repository.
///
/// Identity is `(origin, name)`. Records are cheap to produce and are not
/// cached by the engine; iterators hand out a fresh one per step.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    /// Numeric row id in the repository index.
    pub id: i64,
    /// Ports-style origin (`category/subpath`).
    pub origin: String,
    /// Package name.
    pub name: String,
    /// Unique id; equal to the name for indexed packages, `"@" + name` for
    /// virtual group packages.
    pub uniqueid: String,
    /// Version string.
    pub version: String,
    /// One-line comment.
    pub comment: String,
    /// Install prefix.
    pub prefix: String,
    /// Long description.
    pub desc: String,
    /// Target architecture.
    pub arch: String,
    /// Maintainer contact.
    pub maintainer: String,
    /// Homepage URL.
    pub www: String,
    /// License combination logic code.
    pub licenselogic: i64,
    /// Installed (flat) size in bytes.
    pub flatsize: i64,
    /// Package archive size in bytes.
    pub pkgsize: i64,
    /// Archive checksum.
    pub cksum: String,
    /// Digest of the package manifest.
    pub manifestdigest: String,
    /// Archive path relative to the repository base URL.
    pub repopath: String,
    /// Name of the repository this record came from.
    pub reponame: String,
    /// Base URL of the repository this record came from.
    pub repourl: String,
    /// Where this record was hydrated from.
    pub provenance: Provenance,
    /// Deferred file list; `None` until loaded.
    pub files: Option<Vec<PackageFile>>,
    /// Deferred configuration-file list; `None` until loaded.
    pub config_files: Option<Vec<String>>,
    /// Deferred directory list; `None` until loaded.
    pub dirs: Option<Vec<String>>,
    /// Annotation key/value map.
    pub annotations: BTreeMap<String, String>,
    /// Which deferred parts have been satisfied on this record.
    pub loaded: LoadFlags,
}

impl PackageRecord {
    /// Create an empty record with the given provenance.
    pub fn new(provenance: Provenance) -> Self {
        Self {
            id: 0,
            origin: String::new(),
            name: String::new(),
            uniqueid: String::new(),
            version: String::new(),
            comment: String::new(),
            prefix: String::new(),
            desc: String::new(),
            arch: String::new(),
            maintainer: String::new(),
            www: String::new(),
            licenselogic: 0,
            flatsize: 0,
            pkgsize: 0,
            cksum: String::new(),
            manifestdigest: String::new(),
            repopath: String::new(),
            reponame: String::new(),
            repourl: String::new(),
            provenance,
            files: None,
            config_files: None,
            dirs: None,
            annotations: BTreeMap::new(),
            loaded: LoadFlags::NONE,
        }
    }
}
