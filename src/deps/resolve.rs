//! Transitive dependency resolution and conflict enumeration.
//!
//! Resolution answers, for one target package, which additional packages the
//! installer must schedule and which hard requirements cannot be satisfied at
//! all. The walk follows declaration order, dedups by package identity, and
//! guards against the cycles that the concrete/abstract graph contains by
//! construction.

use std::collections::HashSet;

use crate::index::Catalog;
use crate::types::dependency::{DependKind, DependencyResolution, Possibility};
use crate::types::package::{Package, StateStatus, StateWant};
use crate::types::{AbsId, PkgId};

/// Per-traversal state: the resolution target plus the abstract names whose
/// dependencies were already walked. A fresh context is created for every
/// public entry, so no marks leak between traversals.
struct Traversal {
    /// The package the resolution was requested for; never scheduled.
    root: PkgId,
    /// Abstract names already expanded in this traversal.
    visited: HashSet<AbsId>,
}

/// Identity test used for the insertion-ordered result set: same name, equal
/// version, same architecture.
fn contains_equivalent(catalog: &Catalog, set: &[PkgId], candidate: PkgId) -> bool {
    let pkg = catalog.pkg(candidate);
    set.iter().any(|id| {
        let other = catalog.pkg(*id);
        other.name == pkg.name
            && other.version == pkg.version
            && other.architecture == pkg.architecture
    })
}

/// What: Compute the packages that must be installed for a target, plus the
/// dependencies that cannot be satisfied.
///
/// Inputs:
/// - `catalog`: Catalog the target lives in.
/// - `target`: Package whose dependency closure is wanted.
///
/// Output:
/// - Returns the additional packages to install (dependency-before-dependent,
///   deduplicated) and a printable form of every unsatisfiable hard
///   requirement. Advisory kinds (Recommends, Suggests) never contribute to
///   the unresolved list.
///
/// Details:
/// - Compound dependencies are walked in declaration order; within one, the
///   first satisfiable possibility wins.
/// - A possibility is first checked against installed packages; only when no
///   installed candidate satisfies it is an installable candidate selected.
/// - Starred (greedy) dependencies schedule every trivially installable
///   satisfier instead of just one.
/// - Recommended or suggested candidates the user marked for removal are
///   skipped.
/// - The walk marks abstract names as visited, so cyclic graphs terminate;
///   every call starts with a clean traversal.
///
/// # Example
///
/// ```
/// use ipk_toolkit::config::Config;
/// use ipk_toolkit::deps::fetch_unsatisfied_dependencies;
/// use ipk_toolkit::index::Catalog;
/// use ipk_toolkit::control::{parse_feed, FieldMask};
///
/// let mut catalog = Catalog::new(Config::new().with_arch("arm", 10));
/// let feed = "Package: app\nVersion: 1.0\nArchitecture: arm\nDepends: lib\n\n\
///             Package: lib\nVersion: 1.0\nArchitecture: arm\n\n";
/// let ids = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
/// let report = fetch_unsatisfied_dependencies(&catalog, ids[0]);
/// assert_eq!(report.to_install, vec![ids[1]]);
/// assert!(report.unresolved.is_empty());
/// ```
#[must_use]
pub fn fetch_unsatisfied_dependencies(catalog: &Catalog, target: PkgId) -> DependencyResolution {
    let mut traversal = Traversal {
        root: target,
        visited: HashSet::new(),
    };
    let mut report = DependencyResolution::default();
    resolve_into(catalog, target, &mut traversal, &mut report);
    report
}

/// Recursive worker behind [`fetch_unsatisfied_dependencies`]; appends into
/// the shared report.
fn resolve_into(
    catalog: &Catalog,
    current: PkgId,
    traversal: &mut Traversal,
    report: &mut DependencyResolution,
) {
    let pkg = catalog.pkg(current);
    let Some(parent) = catalog.abstract_by_name(&pkg.name) else {
        tracing::error!("internal error: {} not in the catalog name index", pkg.name);
        return;
    };
    if traversal.visited.contains(&parent) {
        return;
    }
    traversal.visited.insert(parent);

    for dep in &pkg.depends {
        if dep.kind == DependKind::GreedyDepend {
            resolve_greedy(catalog, &dep.possibilities, traversal, report);
            continue;
        }

        // First pass: an installed candidate satisfies the requirement.
        let mut found = false;
        for poss in &dep.possibilities {
            let installed = catalog.fetch_best_installation_candidate(
                poss.abs,
                |p| p.is_installed() && poss.constraint_satisfied(&p.version),
                true,
            );
            if installed.is_some() {
                found = true;
                break;
            }
        }

        // Second pass: look for an installable candidate.
        let mut satisfier: Option<PkgId> = None;
        if !found {
            for poss in &dep.possibilities {
                let candidate = catalog.fetch_best_installation_candidate(
                    poss.abs,
                    |p| poss.constraint_satisfied(&p.version),
                    true,
                );
                let Some(candidate) = candidate else {
                    continue;
                };

                // User request overrides package recommendation.
                if dep.kind.is_advisory()
                    && matches!(
                        catalog.pkg(candidate).state_want,
                        StateWant::Deinstall | StateWant::Purge
                    )
                {
                    tracing::info!(
                        "{}: ignoring recommendation for {} at user request",
                        pkg.name,
                        catalog.pkg(candidate).name
                    );
                    continue;
                }

                satisfier = Some(candidate);
                break;
            }
        }

        if found {
            continue;
        }

        match satisfier {
            None => {
                if dep.kind.is_advisory() {
                    tracing::info!(
                        "{}: unsatisfied recommendation for {}",
                        pkg.name,
                        catalog.abs(dep.possibilities[0].abs).name
                    );
                } else {
                    report.unresolved.push(catalog.depend_to_string(dep));
                }
            }
            Some(satisfier) => {
                if dep.kind == DependKind::Suggest {
                    // Just mention it politely.
                    tracing::info!(
                        "package {} suggests installing {}",
                        pkg.name,
                        catalog.pkg(satisfier).name
                    );
                } else if satisfier != traversal.root
                    && satisfier != current
                    && !contains_equivalent(catalog, &report.to_install, satisfier)
                {
                    resolve_into(catalog, satisfier, traversal, report);
                    report.to_install.push(satisfier);
                }
            }
        }
    }
}

/// Greedy expansion: schedule every satisfier whose own dependency closure is
/// already wanted for installation.
fn resolve_greedy(
    catalog: &Catalog,
    possibilities: &[Possibility],
    traversal: &mut Traversal,
    report: &mut DependencyResolution,
) {
    for poss in possibilities {
        for provider in catalog.abs(poss.abs).provided_by.clone() {
            for scout_id in catalog.abs(provider).pkgs.clone() {
                let scout = catalog.pkg(scout_id);
                if scout.state_want == StateWant::Install
                    || traversal.visited.contains(&provider)
                    || contains_equivalent(catalog, &report.to_install, scout_id)
                {
                    continue;
                }

                let mut scratch = DependencyResolution::default();
                resolve_into(catalog, scout_id, traversal, &mut scratch);
                if !scratch.unresolved.is_empty() {
                    tracing::debug!("not installing {} due to broken depends", scout.name);
                    continue;
                }
                let trivially_installable = scratch
                    .to_install
                    .iter()
                    .all(|id| catalog.pkg(*id).state_want == StateWant::Install);
                if trivially_installable {
                    tracing::info!("adding satisfier for greedy dependence {}", scout.name);
                    report.to_install.push(scout_id);
                } else {
                    tracing::debug!(
                        "not installing {} due to requirements it would pull in",
                        scout.name
                    );
                }
            }
        }
    }
}

/// What: Enumerate installed packages that conflict with a package.
///
/// Inputs:
/// - `catalog`: Catalog the package lives in.
/// - `target`: Package whose conflicts are evaluated.
///
/// Output:
/// - Returns the installed (or install-wanted) packages whose version
///   satisfies one of the target's conflicts possibilities, excluding
///   packages the target also replaces.
///
/// Details:
/// - Only the conflicting name's own concrete packages are examined;
///   providers of the name do not become conflicts by provision.
/// - A `Replaces` relation on the same name masks the conflict: the old
///   package is upgraded away rather than reported.
#[must_use]
pub fn fetch_conflicts(catalog: &Catalog, target: PkgId) -> Vec<PkgId> {
    let pkg = catalog.pkg(target);
    let mut installed_conflicts: Vec<PkgId> = Vec::new();

    for conflict in &pkg.conflicts {
        for poss in &conflict.possibilities {
            for scout_id in &catalog.abs(poss.abs).pkgs {
                let scout = catalog.pkg(*scout_id);
                let active = scout.state_status == StateStatus::Installed
                    || scout.state_want == StateWant::Install;
                if !active || !poss.constraint_satisfied(&scout.version) {
                    continue;
                }
                if replaces_by_name(catalog, pkg, scout) {
                    tracing::debug!(
                        "conflict between {} and {} masked by replaces",
                        pkg.name,
                        scout.name
                    );
                    continue;
                }
                if !contains_equivalent(catalog, &installed_conflicts, *scout_id) {
                    installed_conflicts.push(*scout_id);
                }
            }
        }
    }

    installed_conflicts
}

/// Whether `pkg` declares a replaces entry naming `scout`.
fn replaces_by_name(catalog: &Catalog, pkg: &Package, scout: &Package) -> bool {
    pkg.replaces
        .iter()
        .any(|abs| catalog.abs(*abs).name == scout.name)
}

/// What: Check whether any concrete package could satisfy a possibility.
///
/// Inputs:
/// - `catalog`: Catalog to probe.
/// - `poss`: Possibility to test.
///
/// Output:
/// - Returns `true` when some provider of the name has a concrete package
///   whose version satisfies the constraint, regardless of its state.
#[must_use]
pub fn dependence_satisfiable(catalog: &Catalog, poss: &Possibility) -> bool {
    catalog.abs(poss.abs).provided_by.iter().any(|provider| {
        catalog
            .abs(*provider)
            .pkgs
            .iter()
            .any(|id| poss.constraint_satisfied(&catalog.pkg(*id).version))
    })
}

/// What: Check whether one package replaces another.
///
/// Inputs:
/// - `catalog`: Catalog both packages live in.
/// - `pkg`: Replacing package.
/// - `replacee`: Package possibly being replaced.
///
/// Output:
/// - Returns `true` when `pkg`'s replaces list intersects `replacee`'s
///   provides list.
#[must_use]
pub fn package_replaces(catalog: &Catalog, pkg: PkgId, replacee: PkgId) -> bool {
    let replaces = &catalog.pkg(pkg).replaces;
    catalog
        .pkg(replacee)
        .provides
        .iter()
        .any(|provided| replaces.contains(provided))
}

/// What: Check whether one package conflicts with another.
///
/// Inputs:
/// - `catalog`: Catalog both packages live in.
/// - `pkg`: Package declaring conflicts.
/// - `other`: Package possibly being conflicted with.
///
/// Output:
/// - Returns `true` when any conflicts possibility of `pkg` names something
///   `other` provides.
#[must_use]
pub fn package_conflicts(catalog: &Catalog, pkg: PkgId, other: PkgId) -> bool {
    let provides = &catalog.pkg(other).provides;
    catalog
        .pkg(pkg)
        .conflicts
        .iter()
        .flat_map(|dep| dep.possibilities.iter())
        .any(|poss| provides.contains(&poss.abs))
}
