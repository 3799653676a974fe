//! Repository definitions
//!
//! A repository is described by a small TOML document: identity, content
//! directory, and matching behavior. Case sensitivity lives here and is
//! threaded explicitly into every matching call; the engine keeps no
//! ambient matching state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::CaseSensitivity;

/// Errors that can occur when loading or parsing a repository definition.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the definition file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be deserialized into a valid
    /// definition.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_true() -> bool {
    true
}

/// A repository definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository name, carried into every record it yields.
    pub name: String,
    /// Base URL package paths are relative to.
    #[serde(default)]
    pub url: String,
    /// Local content directory: holds the index database, the group
    /// document, and the fetch cache.
    pub root: PathBuf,
    /// Whether pattern matching respects letter case. On by default.
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Disabled repositories are skipped by callers; the engine itself
    /// does not consult this.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RepoConfig {
    /// Parse a repository definition from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Parse` if the TOML content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a repository definition from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML content is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The configured case-sensitivity rule.
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        CaseSensitivity::from_flag(self.case_sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
name = "ports"
url = "https://pkgs.example.org/ports"
root = "/var/db/quarry/ports"
"#;

    #[test]
    fn test_parse_definition_with_defaults() {
        let config = RepoConfig::parse(EXAMPLE).unwrap();
        assert_eq!(config.name, "ports");
        assert_eq!(config.root, PathBuf::from("/var/db/quarry/ports"));
        assert!(config.case_sensitive);
        assert!(config.enabled);
        assert_eq!(config.case_sensitivity(), CaseSensitivity::Sensitive);
    }

    #[test]
    fn test_parse_case_insensitive_repository() {
        let config = RepoConfig::parse(
            r#"
name = "ports"
root = "/tmp/ports"
case_sensitive = false
"#,
        )
        .unwrap();
        assert_eq!(config.case_sensitivity(), CaseSensitivity::Insensitive);
        assert_eq!(config.url, "");
    }

    #[test]
    fn test_parse_malformed_definition() {
        assert!(RepoConfig::parse("not valid toml {{{").is_err());
        // Missing the required root.
        assert!(RepoConfig::parse("name = \"ports\"").is_err());
    }
}
