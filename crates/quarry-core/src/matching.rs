//! Match semantics and the predicate compiler
//!
//! Maps (match mode, search field, case sensitivity) to SQL predicate
//! fragments and sort fields to `ORDER BY` clauses. The pattern itself is
//! never spliced into query text; every predicate binds it at `?1`.

/// Comparison semantics between a search pattern and a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Match every record; the pattern is ignored and may be empty.
    All,
    /// Literal equality, always case-sensitive. Fast path for internal
    /// capability lookups; not exposed to user-facing searches.
    Internal,
    /// Equality under the repository's case-sensitivity rule.
    Exact,
    /// Shell-glob match; case folding mirrors the repository rule.
    Glob,
    /// Regular-expression match via the index's `REGEXP` operator; case
    /// handling is the backend's.
    Regex,
}

/// Which package attribute a pattern is compared against.
///
/// The same enum doubles as the sort-field domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// No field filter (only meaningful with [`MatchMode::All`] or a
    /// caller-supplied condition fragment) or no ordering.
    None,
    /// Category joined with the origin's sub-path.
    Origin,
    /// Origin with the flavor annotation appended (`origin@flavor`).
    Flavor,
    /// Package name.
    Name,
    /// Name and version joined as `name-version`.
    NameVersion,
    /// One-line comment.
    Comment,
    /// Long description.
    Description,
}

impl SearchField {
    /// Column expression this field compares against, or `None` for
    /// [`SearchField::None`] (which emits no predicate at all).
    pub(crate) fn column_expr(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Origin => Some("categories.name || substr(p.origin, instr(p.origin, '/'))"),
            Self::Flavor => {
                Some("categories.name || substr(p.origin, instr(p.origin, '/')) || '@' || flavor")
            }
            Self::Name => Some("p.name"),
            Self::NameVersion => Some("p.name || '-' || p.version"),
            Self::Comment => Some("p.comment"),
            Self::Description => Some("p.desc"),
        }
    }

    /// `ORDER BY` clause when this field is used as a sort key.
    ///
    /// Flavor deliberately aliases to the name ordering; the index carries
    /// no flavor-aware collation.
    pub(crate) fn order_clause(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Origin => Some(" ORDER BY p.origin"),
            Self::Flavor | Self::Name => Some(" ORDER BY p.name"),
            Self::NameVersion => Some(" ORDER BY p.name, p.version"),
            Self::Comment => Some(" ORDER BY p.comment"),
            Self::Description => Some(" ORDER BY p.desc"),
        }
    }
}

/// Whether pattern matching respects letter case.
///
/// Threaded explicitly from repository configuration into every compiler
/// and group-store call; there is no ambient global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// Patterns match case-sensitively.
    Sensitive,
    /// Patterns match case-insensitively (ASCII folding, matching the
    /// index's `NOCASE` collation).
    Insensitive,
}

impl CaseSensitivity {
    /// Build from a configuration flag.
    pub fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::Sensitive
        } else {
            Self::Insensitive
        }
    }

    /// True for [`CaseSensitivity::Sensitive`].
    pub fn sensitive(self) -> bool {
        self == Self::Sensitive
    }
}

/// Comparison template for a match mode, with `{}` standing in for the
/// column expression. `None` for [`MatchMode::All`], which is
/// unconditionally true.
fn comparison(mode: MatchMode, case: CaseSensitivity) -> Option<&'static str> {
    match mode {
        MatchMode::All => None,
        MatchMode::Internal => Some("{} = ?1"),
        MatchMode::Exact => {
            if case.sensitive() {
                Some("{} = ?1")
            } else {
                Some("{} = ?1 COLLATE NOCASE")
            }
        }
        MatchMode::Glob => {
            if case.sensitive() {
                Some("{} GLOB ?1")
            } else {
                Some("{} GLOB ?1 COLLATE NOCASE")
            }
        }
        MatchMode::Regex => Some("{} REGEXP ?1"),
    }
}

/// Predicate comparing `field` against the pattern bound at `?1`, or
/// `None` when either the mode or the field calls for no predicate.
pub(crate) fn field_predicate(
    mode: MatchMode,
    field: SearchField,
    case: CaseSensitivity,
) -> Option<String> {
    let column = field.column_expr()?;
    Some(comparison(mode, case)?.replace("{}", column))
}

/// Predicate for the free-text condition search: the pattern bound at `?1`
/// must equal either the package name or `name-version`.
pub(crate) fn name_predicate(mode: MatchMode, case: CaseSensitivity) -> Option<String> {
    if mode == MatchMode::Internal {
        return Some("p.name = ?1".to_string());
    }
    let how = comparison(mode, case)?;
    Some(format!(
        "({} OR {})",
        how.replace("{}", "p.name"),
        how.replace("{}", "p.name || '-' || p.version")
    ))
}
