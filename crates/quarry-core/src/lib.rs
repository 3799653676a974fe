//! quarry-core -- repository query engine for binary packages
//!
//! The engine turns a search request (pattern, match semantics, target
//! field, sort field) into either a compiled, parameterized SQL query
//! against a per-repository package index, or an in-memory filter over
//! the repository's virtual-group document, and exposes both behind one
//! pull-based iterator trait.
//!
//! # Overview
//!
//! - [`Repository`] owns the index connection and the content directory
//!   and exposes every operation: [`Repository::query`],
//!   [`Repository::search`], capability lookups, group search,
//!   [`Repository::ensure_loaded`], and [`Repository::stat`].
//! - [`MatchMode`] crossed with [`SearchField`] and the repository's
//!   [`CaseSensitivity`] compiles to predicate and order-by fragments;
//!   patterns are always bound, never spliced.
//! - [`RepoIterator`] is implemented by [`IndexIter`] (index rows) and
//!   [`GroupIter`] (synthesized virtual packages).
//! - [`PackageRecord`] file/directory lists are deferred: absent until a
//!   caller requests them with [`LoadFlags`].
//!
//! Everything is synchronous and single-threaded; concurrent readers
//! are the storage backend's concern.

pub mod config;
pub mod error;
pub mod iter;
pub mod matching;
pub mod paths;
pub mod record;
pub mod repo;
pub mod stats;

mod cache;
mod groups;
mod query;

pub use config::{ConfigError, RepoConfig};
pub use error::RepoError;
pub use iter::{GroupIter, IndexIter, IterMode, RepoIterator};
pub use matching::{CaseSensitivity, MatchMode, SearchField};
pub use record::{LoadFlags, PackageFile, PackageRecord, Provenance};
pub use repo::Repository;
pub use stats::StatKind;
