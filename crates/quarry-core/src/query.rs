//! SQL assembly for the repository query shapes
//!
//! Builds the five query shapes the engine runs against a repository
//! index: free-text/condition search, field search with sort, generic
//! provide/require lookups, and shared-library provide/require lookups.
//! Patterns and capability names are always bound at `?1`; the only text
//! spliced into a statement is engine-owned fragments, quoted repository
//! identity literals, and the validated caller condition fragment.

use crate::error::RepoError;
use crate::matching::{self, CaseSensitivity, MatchMode, SearchField};

/// Quote a string as a SQL text literal.
fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// The column set every query shape selects, with the repository name and
/// URL spliced in as literal columns so multi-repository result sets can
/// be merged unambiguously downstream.
fn select_columns(reponame: &str, repourl: &str) -> String {
    format!(
        "p.id, p.origin, p.name, p.name AS uniqueid, p.version, p.comment, \
         p.prefix, p.desc, p.arch, p.maintainer, p.www, \
         p.licenselogic, p.flatsize, p.pkgsize, \
         p.cksum, p.manifestdigest, p.path AS repopath, \
         {} AS dbname, {} AS repourl",
        literal(reponame),
        literal(repourl)
    )
}

/// Common-table expression resolving each package's flavor annotation.
const FLAVOR_CTE: &str = "WITH flavors AS \
     (SELECT package_id, value.annotation AS flavor FROM pkg_annotation \
      LEFT JOIN annotation tag ON pkg_annotation.tag_id = tag.annotation_id \
      LEFT JOIN annotation value ON pkg_annotation.value_id = value.annotation_id \
      WHERE tag.annotation = 'flavor') ";

/// Joins bringing categories and flavors into scope for field predicates.
const CATEGORY_FLAVOR_JOINS: &str = "LEFT JOIN pkg_categories ON p.id = pkg_categories.package_id \
     LEFT JOIN categories ON categories.id = pkg_categories.category_id \
     LEFT JOIN flavors ON flavors.package_id = p.id ";

/// Validate a caller-supplied condition fragment.
///
/// The fragment is spliced into query text verbatim, so it is a trust
/// boundary: it must originate from internal, non-user-controlled call
/// sites and contain a single boolean expression. Statement separators
/// and line comments are rejected outright; everything else is the
/// caller's contract.
pub(crate) fn validate_condition(cond: &str) -> Result<&str, RepoError> {
    let cond = cond.trim();
    if cond.is_empty() {
        return Err(RepoError::InvalidArgument(
            "empty condition fragment".to_string(),
        ));
    }
    if cond.contains(';') || cond.contains("--") {
        return Err(RepoError::InvalidArgument(format!(
            "condition fragment contains a statement separator: {cond}"
        )));
    }
    Ok(cond)
}

/// Build the free-text/condition search.
///
/// `Internal` matches take a quick shape with no flavor resolution; every
/// other mode gets the full category/flavor joins. The match-mode
/// predicate compares the pattern against name and `name-version`; an
/// optional validated condition fragment is ANDed in.
pub(crate) fn condition_query_sql(
    reponame: &str,
    repourl: &str,
    cond: Option<&str>,
    mode: MatchMode,
    case: CaseSensitivity,
) -> Result<String, RepoError> {
    let predicate = matching::name_predicate(mode, case);
    let filter = match (predicate, cond) {
        (None, None) => String::new(),
        (Some(p), None) => format!("WHERE {p} "),
        (None, Some(c)) => format!("WHERE ( {} ) ", validate_condition(c)?),
        (Some(p), Some(c)) => format!("WHERE {p} AND ( {} ) ", validate_condition(c)?),
    };

    let columns = select_columns(reponame, repourl);
    let sql = if mode == MatchMode::Internal {
        format!("SELECT DISTINCT {columns} FROM packages AS p {filter}ORDER BY p.name;")
    } else {
        format!(
            "{FLAVOR_CTE}SELECT DISTINCT {columns} FROM packages AS p \
             {CATEGORY_FLAVOR_JOINS}{filter}ORDER BY p.name;"
        )
    };
    Ok(sql)
}

/// Build the field search with sort.
///
/// When the mode/field combination yields no predicate the filter
/// degrades to an unconditional `TRUE`, which is intentional only for
/// [`MatchMode::All`].
pub(crate) fn search_sql(
    reponame: &str,
    repourl: &str,
    mode: MatchMode,
    field: SearchField,
    sort: SearchField,
    case: CaseSensitivity,
) -> String {
    let predicate = matching::field_predicate(mode, field, case)
        .unwrap_or_else(|| "TRUE".to_string());
    let order = sort.order_clause().unwrap_or("");
    format!(
        "{FLAVOR_CTE}SELECT DISTINCT {} FROM packages AS p \
         {CATEGORY_FLAVOR_JOINS}WHERE {predicate}{order};",
        select_columns(reponame, repourl)
    )
}

/// Packages declaring a generic provide equal to the capability bound at
/// `?1`.
pub(crate) fn provide_sql(reponame: &str, repourl: &str) -> String {
    format!(
        "SELECT {} FROM packages AS p \
         INNER JOIN pkg_provides AS ps ON p.id = ps.package_id \
         WHERE ps.provide_id IN (SELECT id FROM provides WHERE provide = ?1);",
        select_columns(reponame, repourl)
    )
}

/// Packages declaring a generic require equal to the capability bound at
/// `?1`.
pub(crate) fn require_sql(reponame: &str, repourl: &str) -> String {
    format!(
        "SELECT {} FROM packages AS p \
         INNER JOIN pkg_requires AS ps ON p.id = ps.package_id \
         WHERE ps.require_id = (SELECT id FROM requires WHERE require = ?1);",
        select_columns(reponame, repourl)
    )
}

/// Packages providing a shared library whose name starts from the soname
/// bound at `?1`.
///
/// The range match (`BETWEEN ?1 AND ?1 || '.9'`) tolerates
/// version-suffixed library names sharing a soname prefix.
pub(crate) fn shlib_provide_sql(reponame: &str, repourl: &str) -> String {
    format!(
        "SELECT {} FROM packages AS p \
         INNER JOIN pkg_shlibs_provided AS ps ON p.id = ps.package_id \
         WHERE ps.shlib_id IN (SELECT id FROM shlibs WHERE \
         name BETWEEN ?1 AND ?1 || '.9');",
        select_columns(reponame, repourl)
    )
}

/// Packages requiring the shared library named exactly by `?1`.
pub(crate) fn shlib_require_sql(reponame: &str, repourl: &str) -> String {
    format!(
        "SELECT {} FROM packages AS p \
         INNER JOIN pkg_shlibs_required AS ps ON p.id = ps.package_id \
         WHERE ps.shlib_id = (SELECT id FROM shlibs WHERE name = ?1);",
        select_columns(reponame, repourl)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "ports";
    const URL: &str = "https://pkgs.example.org/ports";

    fn bind_markers(sql: &str) -> usize {
        sql.matches("?1").count()
    }

    #[test]
    fn test_condition_query_internal_skips_flavor_cte() {
        let sql = condition_query_sql(REPO, URL, None, MatchMode::Internal, CaseSensitivity::Sensitive)
            .unwrap();
        assert!(!sql.contains("WITH flavors"));
        assert!(sql.contains("WHERE p.name = ?1"));
        assert!(sql.ends_with("ORDER BY p.name;"));
    }

    #[test]
    fn test_condition_query_full_shape_joins_flavors() {
        let sql = condition_query_sql(REPO, URL, None, MatchMode::Glob, CaseSensitivity::Sensitive)
            .unwrap();
        assert!(sql.starts_with("WITH flavors AS"));
        assert!(sql.contains("LEFT JOIN categories"));
        assert!(sql.contains("p.name GLOB ?1"));
    }

    #[test]
    fn test_condition_fragment_is_wrapped_and_anded() {
        let sql = condition_query_sql(
            REPO,
            URL,
            Some("p.arch = 'amd64'"),
            MatchMode::Exact,
            CaseSensitivity::Sensitive,
        )
        .unwrap();
        assert!(sql.contains("AND ( p.arch = 'amd64' )"));

        // With MatchMode::All the fragment is the whole filter.
        let sql = condition_query_sql(
            REPO,
            URL,
            Some("p.arch = 'amd64'"),
            MatchMode::All,
            CaseSensitivity::Sensitive,
        )
        .unwrap();
        assert!(sql.contains("WHERE ( p.arch = 'amd64' )"));
        assert!(!sql.contains("AND"));
    }

    #[test]
    fn test_condition_fragment_rejects_statement_separators() {
        for cond in ["1=1; DROP TABLE packages", "x = 1 -- y", "  "] {
            assert!(matches!(
                validate_condition(cond),
                Err(RepoError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_search_sql_degrades_to_true_without_predicate() {
        let sql = search_sql(
            REPO,
            URL,
            MatchMode::All,
            SearchField::None,
            SearchField::None,
            CaseSensitivity::Sensitive,
        );
        assert!(sql.contains("WHERE TRUE;"));
    }

    #[test]
    fn test_search_sql_orders_per_sort_field() {
        let sql = search_sql(
            REPO,
            URL,
            MatchMode::Glob,
            SearchField::Name,
            SearchField::NameVersion,
            CaseSensitivity::Sensitive,
        );
        assert!(sql.contains("WHERE p.name GLOB ?1 ORDER BY p.name, p.version;"));
    }

    #[test]
    fn test_search_sql_carries_repo_identity_literals() {
        let sql = search_sql(
            "o'brien",
            URL,
            MatchMode::All,
            SearchField::None,
            SearchField::None,
            CaseSensitivity::Sensitive,
        );
        // Quote in the repository name is doubled, not left to break the text.
        assert!(sql.contains("'o''brien' AS dbname"));
        assert!(sql.contains(&format!("'{URL}' AS repourl")));
    }

    #[test]
    fn test_capability_shapes_bind_exactly_one_parameter() {
        for sql in [
            provide_sql(REPO, URL),
            require_sql(REPO, URL),
            shlib_require_sql(REPO, URL),
        ] {
            assert_eq!(bind_markers(&sql), 1, "{sql}");
        }
        // The shlib provide range match reuses the single parameter twice.
        let sql = shlib_provide_sql(REPO, URL);
        assert_eq!(bind_markers(&sql), 2);
        assert!(sql.contains("BETWEEN ?1 AND ?1 || '.9'"));
    }
}
