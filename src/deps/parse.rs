//! Parsing of dependency-bearing control fields.
//!
//! Dependency fields are comma-separated compound dependencies; each compound
//! is a `|`-separated list of possibilities; each possibility is a package
//! name with an optional parenthesized version constraint. A trailing `*`
//! outside the parentheses promotes the whole compound to a greedy
//! dependency. Abstract names are interned into the catalog as they are
//! encountered.

use crate::index::Catalog;
use crate::types::dependency::{CompoundDepend, DependKind, Possibility, VersionOp};
use crate::types::package::Package;

/// What: Parse one possibility (`name [ '(' op version ')' ] [ '*' ]`).
///
/// Inputs:
/// - `catalog`: Catalog to intern the abstract name into.
/// - `text`: Possibility text.
///
/// Output:
/// - Returns the possibility and whether a greedy star followed it, or
///   `None` for empty input.
///
/// Details:
/// - The name is the first whitespace-delimited token.
/// - A constraint without a recognized operator is logged and dropped; the
///   possibility then matches any version.
fn parse_possibility(catalog: &mut Catalog, text: &str) -> Option<(Possibility, bool)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (name, mut rest) = match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim_start()),
        None => (text, ""),
    };

    let mut constraint = None;
    if let Some(inner) = rest.strip_prefix('(') {
        let (content, after) = match inner.find(')') {
            Some(pos) => (&inner[..pos], &inner[pos + 1..]),
            None => (inner, ""),
        };
        let content = content.trim();
        if let Some((op, version)) = VersionOp::strip_from(content) {
            constraint = Some((op, version.trim().to_string()));
        } else {
            tracing::warn!("constraint without operator in {:?}, ignoring", text);
        }
        rest = after.trim_start();
    }

    let greedy = rest.starts_with('*');
    let abs = catalog.ensure_abstract(name);
    Some((Possibility { abs, constraint }, greedy))
}

/// What: Parse one compound dependency (a `|`-separated disjunction).
///
/// Inputs:
/// - `catalog`: Catalog to intern abstract names into.
/// - `text`: Compound dependency text (one comma-separated item).
/// - `kind`: Dependency kind declared by the field.
///
/// Output:
/// - Returns the compound dependency, or `None` when no possibility could be
///   parsed.
///
/// Details:
/// - A trailing `*` on any possibility promotes dependency kinds to
///   [`DependKind::GreedyDepend`]; conflicts are never promoted.
#[must_use]
pub fn parse_compound_depend(
    catalog: &mut Catalog,
    text: &str,
    kind: DependKind,
) -> Option<CompoundDepend> {
    let mut possibilities = Vec::new();
    let mut kind = kind;

    for alt in text.split('|') {
        if let Some((poss, greedy)) = parse_possibility(catalog, alt) {
            if greedy && kind != DependKind::Conflicts {
                kind = DependKind::GreedyDepend;
            }
            possibilities.push(poss);
        }
    }

    if possibilities.is_empty() {
        return None;
    }
    Some(CompoundDepend {
        kind,
        possibilities,
    })
}

/// What: Parse a whole dependency field into a package record.
///
/// Inputs:
/// - `catalog`: Catalog to intern abstract names into.
/// - `pkg`: Record receiving the parsed records.
/// - `kind`: Dependency kind of the field (`Depends`, `Pre-Depends`,
///   `Recommends`, `Suggests` or `Conflicts`).
/// - `value`: Raw field value.
///
/// Output:
/// - Appends to `pkg.depends` (or `pkg.conflicts` for the conflicts kind) in
///   declaration order.
///
/// # Example
///
/// ```
/// use ipk_toolkit::config::Config;
/// use ipk_toolkit::deps::parse_depend_field;
/// use ipk_toolkit::index::Catalog;
/// use ipk_toolkit::types::dependency::DependKind;
/// use ipk_toolkit::types::package::Package;
///
/// let mut catalog = Catalog::new(Config::new());
/// let mut pkg = Package::new("app");
/// parse_depend_field(
///     &mut catalog,
///     &mut pkg,
///     DependKind::Depend,
///     "libc, libssl (>= 3.0) | libtls",
/// );
/// assert_eq!(pkg.depends.len(), 2);
/// assert_eq!(pkg.depends[1].possibilities.len(), 2);
/// ```
pub fn parse_depend_field(
    catalog: &mut Catalog,
    pkg: &mut Package,
    kind: DependKind,
    value: &str,
) {
    for item in value.split(',') {
        if let Some(dep) = parse_compound_depend(catalog, item, kind) {
            if kind == DependKind::Conflicts {
                pkg.conflicts.push(dep);
            } else {
                pkg.depends.push(dep);
            }
        }
    }
}

/// What: Parse a `Provides` field value into a package record.
///
/// Inputs:
/// - `catalog`: Catalog to intern the provided names into.
/// - `pkg`: Record receiving the provides entries.
/// - `value`: Raw field value; names separated by commas or whitespace.
///
/// Output:
/// - Appends interned handles to `pkg.provides`, skipping duplicates. The
///   `provided_by` back-edges are wired when the record is inserted into the
///   catalog.
pub fn parse_provides_field(catalog: &mut Catalog, pkg: &mut Package, value: &str) {
    for name in value.split([',', ' ']) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let abs = catalog.ensure_abstract(name);
        if !pkg.provides.contains(&abs) {
            pkg.provides.push(abs);
        }
    }
}

/// What: Parse a `Replaces` field value into a package record.
///
/// Inputs:
/// - `catalog`: Catalog to intern the replaced names into.
/// - `pkg`: Record receiving the replaces entries.
/// - `value`: Raw field value; names separated by commas or whitespace.
///
/// Output:
/// - Appends interned handles to `pkg.replaces`, skipping duplicates. The
///   `replaced_by` back-edges are wired at insertion, where the matching
///   conflict declaration is known.
pub fn parse_replaces_field(catalog: &mut Catalog, pkg: &mut Package, value: &str) {
    for name in value.split([',', ' ']) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let abs = catalog.ensure_abstract(name);
        if !pkg.replaces.contains(&abs) {
            pkg.replaces.push(abs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn catalog() -> Catalog {
        Catalog::new(Config::new())
    }

    #[test]
    fn parses_bare_name() {
        let mut catalog = catalog();
        let dep = parse_compound_depend(&mut catalog, "libc", DependKind::Depend)
            .expect("should parse");
        assert_eq!(dep.kind, DependKind::Depend);
        assert_eq!(dep.possibilities.len(), 1);
        assert!(dep.possibilities[0].constraint.is_none());
        assert_eq!(catalog.abs(dep.possibilities[0].abs).name, "libc");
    }

    #[test]
    fn parses_constraints() {
        let mut catalog = catalog();
        let cases = [
            ("libfoo (>= 1.2)", VersionOp::LaterEqual, "1.2"),
            ("libfoo (<= 2.0)", VersionOp::EarlierEqual, "2.0"),
            ("libfoo (= 1.0)", VersionOp::Equal, "1.0"),
            ("libfoo (<< 2)", VersionOp::Earlier, "2"),
            ("libfoo (>> 1)", VersionOp::Later, "1"),
            // Legacy single-character forms read as the inclusive ops
            ("libfoo (< 2)", VersionOp::EarlierEqual, "2"),
            ("libfoo (> 1)", VersionOp::LaterEqual, "1"),
        ];
        for (text, op, version) in cases {
            let dep = parse_compound_depend(&mut catalog, text, DependKind::Depend)
                .expect("should parse");
            let constraint = dep.possibilities[0]
                .constraint
                .as_ref()
                .expect("constraint expected");
            assert_eq!(constraint.0, op, "{text}");
            assert_eq!(constraint.1, version, "{text}");
        }
    }

    #[test]
    fn constraint_without_space_is_accepted() {
        let mut catalog = catalog();
        let dep = parse_compound_depend(&mut catalog, "libfoo (>=1.2)", DependKind::Depend)
            .expect("should parse");
        let constraint = dep.possibilities[0]
            .constraint
            .as_ref()
            .expect("constraint expected");
        assert_eq!(constraint.0, VersionOp::LaterEqual);
        assert_eq!(constraint.1, "1.2");
    }

    #[test]
    fn constraint_without_operator_is_dropped() {
        let mut catalog = catalog();
        let dep = parse_compound_depend(&mut catalog, "libfoo (1.2)", DependKind::Depend)
            .expect("should parse");
        assert!(dep.possibilities[0].constraint.is_none());
    }

    #[test]
    fn parses_alternatives() {
        let mut catalog = catalog();
        let dep = parse_compound_depend(
            &mut catalog,
            "libssl (>= 3.0) | libtls | libcrypto-compat",
            DependKind::Depend,
        )
        .expect("should parse");
        assert_eq!(dep.possibilities.len(), 3);
        assert!(dep.possibilities[0].constraint.is_some());
        assert!(dep.possibilities[1].constraint.is_none());
        assert_eq!(
            catalog.abs(dep.possibilities[2].abs).name,
            "libcrypto-compat"
        );
    }

    #[test]
    fn greedy_star_promotes_kind() {
        let mut catalog = catalog();
        let dep = parse_compound_depend(&mut catalog, "plugin-api *", DependKind::Depend)
            .expect("should parse");
        assert_eq!(dep.kind, DependKind::GreedyDepend);

        let dep = parse_compound_depend(
            &mut catalog,
            "plugin-api (>= 1.0) *",
            DependKind::Depend,
        )
        .expect("should parse");
        assert_eq!(dep.kind, DependKind::GreedyDepend);

        // Conflicts never promote
        let dep = parse_compound_depend(&mut catalog, "old-api *", DependKind::Conflicts)
            .expect("should parse");
        assert_eq!(dep.kind, DependKind::Conflicts);
    }

    #[test]
    fn field_splits_on_commas() {
        let mut catalog = catalog();
        let mut pkg = Package::new("app");
        parse_depend_field(
            &mut catalog,
            &mut pkg,
            DependKind::Depend,
            "libc, libssl (>= 3.0) | libtls, busybox",
        );
        assert_eq!(pkg.depends.len(), 3);
        assert_eq!(pkg.depends[1].possibilities.len(), 2);
        assert!(pkg.conflicts.is_empty());
    }

    #[test]
    fn conflicts_land_in_conflicts_list() {
        let mut catalog = catalog();
        let mut pkg = Package::new("app");
        parse_depend_field(
            &mut catalog,
            &mut pkg,
            DependKind::Conflicts,
            "old-app, legacy-app (<< 2.0)",
        );
        assert!(pkg.depends.is_empty());
        assert_eq!(pkg.conflicts.len(), 2);
        assert_eq!(pkg.conflicts[0].kind, DependKind::Conflicts);
    }

    #[test]
    fn empty_items_are_skipped() {
        let mut catalog = catalog();
        let mut pkg = Package::new("app");
        parse_depend_field(&mut catalog, &mut pkg, DependKind::Depend, "libc, , ");
        assert_eq!(pkg.depends.len(), 1);
        assert!(parse_compound_depend(&mut catalog, "  ", DependKind::Depend).is_none());
    }

    #[test]
    fn provides_and_replaces_lists() {
        let mut catalog = catalog();
        let mut pkg = Package::new("postfix-lite");
        parse_provides_field(
            &mut catalog,
            &mut pkg,
            "mail-transport-agent, smtp-server mail-transport-agent",
        );
        // Duplicate names collapse
        assert_eq!(pkg.provides.len(), 2);

        parse_replaces_field(&mut catalog, &mut pkg, "postfix, ssmtp");
        assert_eq!(pkg.replaces.len(), 2);
        assert_eq!(catalog.abs(pkg.replaces[0]).name, "postfix");
    }
}
