//! Scalar repository statistics
//!
//! Each statistic is a single aggregate query, recomputed on every call
//! and never cached. A missing statement or empty aggregate is zero, not
//! an error.

use rusqlite::Connection;

/// The statistics a repository can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Unique remote packages in the index.
    RemoteUnique,
    /// Remote packages in the index.
    RemoteCount,
    /// Total size of the remote package archives, in bytes.
    RemoteSize,
    /// Number of remote repositories; computed by a higher-level
    /// collaborator, always zero here.
    RemoteRepos,
    /// Installed package count; computed from the install database by a
    /// different collaborator, always zero here.
    LocalCount,
    /// Installed package size; computed from the install database by a
    /// different collaborator, always zero here.
    LocalSize,
}

impl StatKind {
    /// Aggregate query for this statistic, or `None` for the kinds this
    /// layer reports as zero.
    fn sql(self) -> Option<&'static str> {
        match self {
            Self::RemoteUnique | Self::RemoteCount => Some("SELECT COUNT(id) FROM packages;"),
            Self::RemoteSize => Some("SELECT SUM(pkgsize) FROM packages;"),
            Self::RemoteRepos | Self::LocalCount | Self::LocalSize => None,
        }
    }
}

/// Run the aggregate for `kind` against the index.
pub(crate) fn run(db: &Connection, kind: StatKind) -> i64 {
    let Some(sql) = kind.sql() else {
        return 0;
    };
    tracing::debug!(sql, "computing repository statistic");
    match db.query_row(sql, [], |row| row.get::<_, Option<i64>>(0)) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            tracing::debug!(error = %err, "statistic query failed");
            0
        }
    }
}
