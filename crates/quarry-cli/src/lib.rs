//! quarry - repository search for binary packages
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Thin command-line surface over `quarry-core`: every subcommand opens
//! the repository named by `--repo` (or the default definition) and runs
//! one engine operation against it.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quarry_core::{MatchMode, SearchField};

pub mod cmd;

/// Top-level CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "quarry", version, about = "Repository search for binary packages")]
pub struct Cli {
    /// Path to the repository definition (TOML). Defaults to
    /// ~/.quarry/repos.d/default.toml.
    #[arg(short, long, global = true)]
    pub repo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search the package index by field
    Search {
        /// Pattern to match; ignored with --mode all
        pattern: String,
        #[arg(long, value_enum, default_value = "glob")]
        mode: MatchArg,
        #[arg(long, value_enum, default_value = "name")]
        field: FieldArg,
        #[arg(long, value_enum, default_value = "name")]
        sort: FieldArg,
    },
    /// Match packages by name or name-version
    Query {
        /// Pattern to match; ignored with --mode all
        pattern: String,
        #[arg(long, value_enum, default_value = "glob")]
        mode: MatchArg,
    },
    /// Search the repository's package groups
    Groups {
        /// Pattern to match; a leading '@' is stripped, and anchors
        /// regex patterns to the start
        pattern: String,
        #[arg(long, value_enum, default_value = "glob")]
        mode: MatchArg,
        /// Match group comments instead of group names
        #[arg(long)]
        comments: bool,
    },
    /// List packages providing a capability
    Provides {
        /// Capability name, or a shared-library soname with --shlib
        capability: String,
        /// Look the capability up as a shared library
        #[arg(long)]
        shlib: bool,
    },
    /// List packages requiring a capability
    Requires {
        /// Capability name, or a shared-library soname with --shlib
        capability: String,
        /// Look the capability up as a shared library
        #[arg(long)]
        shlib: bool,
    },
    /// Show one package with its packaged files
    Show {
        /// Exact package name
        name: String,
    },
    /// Print repository statistics
    Stats,
}

/// Match mode argument. `Internal` is an engine-only fast path and is
/// deliberately not exposed.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MatchArg {
    All,
    Exact,
    Glob,
    Regex,
}

impl From<MatchArg> for MatchMode {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::All => Self::All,
            MatchArg::Exact => Self::Exact,
            MatchArg::Glob => Self::Glob,
            MatchArg::Regex => Self::Regex,
        }
    }
}

/// Search/sort field argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldArg {
    None,
    Origin,
    Flavor,
    Name,
    NameVersion,
    Comment,
    Description,
}

impl From<FieldArg> for SearchField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::None => Self::None,
            FieldArg::Origin => Self::Origin,
            FieldArg::Flavor => Self::Flavor,
            FieldArg::Name => Self::Name,
            FieldArg::NameVersion => Self::NameVersion,
            FieldArg::Comment => Self::Comment,
            FieldArg::Description => Self::Description,
        }
    }
}
