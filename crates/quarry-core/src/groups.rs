//! Virtual package groups
//!
//! A repository may ship a `groups.json` document in its content
//! directory: an ordered array of objects, each optionally carrying a
//! `name` and a `comment`. Matching entries are surfaced as synthetic,
//! non-installable package records with a `"@" + name` unique id.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::RepoError;
use crate::matching::{CaseSensitivity, MatchMode};

/// File name of the group document inside a repository content directory.
pub(crate) const GROUPS_FILE: &str = "groups.json";

/// One entry of the group document. Unrecognized keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GroupEntry {
    /// Group name; entries without one are skipped by name searches.
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Group comment; entries without one are skipped by comment searches.
    #[serde(default)]
    pub(crate) comment: Option<String>,
}

/// Load the group document, preserving entry order.
///
/// Returns `Ok(None)` when the repository ships no group document; a
/// document that exists but does not parse fails the whole search.
pub(crate) fn load_entries(path: &Path) -> Result<Option<Vec<GroupEntry>>, RepoError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let entries = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(entries))
}

/// Compile the group regex on first need and test `value` against it.
///
/// Compiling lazily means an invalid pattern surfaces only if some entry
/// actually carries the searched key.
fn regex_matches(
    compiled: &mut Option<Regex>,
    pattern: &str,
    anchor: bool,
    case: CaseSensitivity,
    value: &str,
) -> Result<bool, RepoError> {
    if compiled.is_none() {
        let pattern = if anchor {
            format!("^{pattern}")
        } else {
            pattern.to_string()
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!case.sensitive())
            .build()?;
        *compiled = Some(regex);
    }
    Ok(compiled.as_ref().is_some_and(|re| re.is_match(value)))
}

/// Filter group entries front to back, keeping the ones whose searched
/// attribute matches the pattern.
///
/// A leading `@` (the virtual-package unique-id prefix) is stripped
/// before matching; under [`MatchMode::Regex`] it additionally anchors
/// the pattern to the start of the attribute. Entries missing the
/// searched attribute are dropped, never an error.
pub(crate) fn filter_entries(
    entries: Vec<GroupEntry>,
    pattern: &str,
    mode: MatchMode,
    in_comment: bool,
    case: CaseSensitivity,
) -> Result<Vec<GroupEntry>, RepoError> {
    let (pattern, anchor) = match pattern.strip_prefix('@') {
        Some(rest) => (rest, true),
        None => (pattern, false),
    };

    let glob_pat = if mode == MatchMode::Glob {
        let pat = glob::Pattern::new(pattern)
            .map_err(|err| RepoError::InvalidArgument(format!("invalid glob pattern: {err}")))?;
        Some(pat)
    } else {
        None
    };
    let glob_options = glob::MatchOptions {
        case_sensitive: case.sensitive(),
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let mut regex: Option<Regex> = None;

    let mut matched = Vec::new();
    for entry in entries {
        let value = if in_comment {
            entry.comment.as_deref()
        } else {
            entry.name.as_deref()
        };
        let Some(value) = value else { continue };

        let keep = match mode {
            MatchMode::All => true,
            MatchMode::Internal => value == pattern,
            MatchMode::Exact => {
                if case.sensitive() {
                    value == pattern
                } else {
                    value.eq_ignore_ascii_case(pattern)
                }
            }
            MatchMode::Glob => glob_pat
                .as_ref()
                .is_some_and(|pat| pat.matches_with(value, glob_options)),
            MatchMode::Regex => regex_matches(&mut regex, pattern, anchor, case, value)?,
        };
        if keep {
            matched.push(entry);
        }
    }
    Ok(matched)
}
