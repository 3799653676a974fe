//! Error taxonomy for repository operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by repository queries, group searches, and package
/// hydration.
///
/// "Not found" is never an error: an exhausted iterator or an
/// `Ok(None)` group search is the structural representation of an empty
/// result, so callers that only test for presence keep working while
/// callers that care can tell a parse failure from zero matches.
#[derive(Error, Debug)]
pub enum RepoError {
    /// A caller violated an argument invariant, e.g. an empty pattern with
    /// a match mode other than `All`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested operation is not valid for this backend or record,
    /// e.g. a group search on the origin field, or hydrating an installed
    /// package from the repository cache.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The index store rejected or failed a query.
    #[error("index query failed: {0}")]
    Backend(#[from] rusqlite::Error),

    /// A structured document (group document or archive manifest) was
    /// malformed.
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A regular expression pattern failed to compile.
    #[error("invalid regex: {0}")]
    Pattern(#[from] regex::Error),

    /// A cached package archive carries no embedded manifest.
    #[error("no manifest in package archive: {0}")]
    NoManifest(PathBuf),

    /// An I/O error, e.g. an absent or unreadable cached archive.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
