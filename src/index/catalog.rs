//! The package catalog: arenas of concrete packages and abstract names.
//!
//! The catalog maintains the bipartite graph between concrete packages and
//! abstract (possibly virtual) names. The graph is cyclic by construction, so
//! nodes refer to each other through stable arena handles ([`PkgId`],
//! [`AbsId`]) instead of owning references.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::{IpkToolkitError, Result};
use crate::types::dependency::{CompoundDepend, DependKind};
use crate::types::package::{compare_name_version_arch, Package, StateFlags, StateStatus};
use crate::types::{AbsId, PkgId};

/// An abstract package: a name that zero or more concrete packages provide.
///
/// Real package names and virtual names supplied through `Provides` are both
/// abstract packages; a real name always appears in its own `provided_by`
/// set.
#[derive(Clone, Debug)]
pub struct AbstractPkg {
    /// The name this node stands for.
    pub name: String,
    /// Abstracts whose concrete packages provide this name (contains self).
    pub provided_by: Vec<AbsId>,
    /// Concrete packages carrying exactly this name, insertion order.
    pub pkgs: Vec<PkgId>,
    /// Abstracts that replace this name (and also conflict with it).
    pub replaced_by: Vec<AbsId>,
    /// Abstracts whose packages depend on or recommend this name.
    pub depended_upon_by: Vec<AbsId>,
    /// Aggregated state flags of the name.
    pub state_flag: StateFlags,
    /// Aggregated installation status of the name.
    pub state_status: StateStatus,
}

impl AbstractPkg {
    /// Create an empty abstract package providing itself.
    fn new(name: &str, id: AbsId) -> Self {
        Self {
            name: name.to_string(),
            provided_by: vec![id],
            pkgs: Vec::new(),
            replaced_by: Vec::new(),
            depended_upon_by: Vec::new(),
            state_flag: StateFlags::OK,
            state_status: StateStatus::NotInstalled,
        }
    }
}

/// In-memory catalog of all known packages.
///
/// Holds the configuration context, the concrete package arena, the abstract
/// name arena, and the name index. Packages live for the catalog's lifetime;
/// duplicate insertions are reconciled by architecture priority rather than
/// stored twice.
#[derive(Debug)]
pub struct Catalog {
    /// Configuration context (architecture priorities, feeds, destinations).
    config: Config,
    /// Concrete package arena; `PkgId` indexes into it.
    packages: Vec<Package>,
    /// Abstract package arena; `AbsId` indexes into it.
    abstracts: Vec<AbstractPkg>,
    /// Name index over the abstract arena.
    abs_by_name: HashMap<String, AbsId>,
}

impl Catalog {
    /// What: Create an empty catalog owning a configuration context.
    ///
    /// Inputs:
    /// - `config`: Configuration the catalog resolves architectures, feeds
    ///   and destinations against.
    ///
    /// Output:
    /// - Returns the empty catalog.
    ///
    /// # Example
    ///
    /// ```
    /// use ipk_toolkit::config::Config;
    /// use ipk_toolkit::index::Catalog;
    ///
    /// let catalog = Catalog::new(Config::new().with_arch("arm_cortex-a9", 10));
    /// assert!(catalog.is_empty());
    /// ```
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            packages: Vec::new(),
            abstracts: Vec::new(),
            abs_by_name: HashMap::new(),
        }
    }

    /// The configuration context this catalog was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of concrete packages in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the catalog holds no concrete packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// What: Intern an abstract package name.
    ///
    /// Inputs:
    /// - `name`: Package name, real or virtual.
    ///
    /// Output:
    /// - Returns the handle of the existing or freshly created abstract
    ///   package.
    ///
    /// Details:
    /// - A fresh abstract package starts out providing itself, which keeps
    ///   the self-provision invariant without a separate fixup pass.
    pub fn ensure_abstract(&mut self, name: &str) -> AbsId {
        if let Some(id) = self.abs_by_name.get(name) {
            return *id;
        }
        let id = AbsId(self.abstracts.len());
        self.abstracts.push(AbstractPkg::new(name, id));
        self.abs_by_name.insert(name.to_string(), id);
        id
    }

    /// Look up an abstract package by name without creating it.
    #[must_use]
    pub fn abstract_by_name(&self, name: &str) -> Option<AbsId> {
        self.abs_by_name.get(name).copied()
    }

    /// Access an abstract package by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this catalog.
    #[must_use]
    pub fn abs(&self, id: AbsId) -> &AbstractPkg {
        &self.abstracts[id.0]
    }

    /// Access a concrete package by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this catalog.
    #[must_use]
    pub fn pkg(&self, id: PkgId) -> &Package {
        &self.packages[id.0]
    }

    /// Mutable access to a concrete package; used by the installer layer to
    /// record want-state and status transitions.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this catalog.
    pub fn pkg_mut(&mut self, id: PkgId) -> &mut Package {
        &mut self.packages[id.0]
    }

    /// Iterate over all concrete packages with their handles.
    pub fn packages(&self) -> impl Iterator<Item = (PkgId, &Package)> {
        self.packages.iter().enumerate().map(|(i, p)| (PkgId(i), p))
    }

    /// What: All package handles in deterministic listing order.
    ///
    /// Inputs: None.
    ///
    /// Output:
    /// - Returns handles ordered by name, then version, then architecture
    ///   priority.
    #[must_use]
    pub fn sorted_package_ids(&self) -> Vec<PkgId> {
        let mut ids: Vec<PkgId> = (0..self.packages.len()).map(PkgId).collect();
        ids.sort_by(|a, b| compare_name_version_arch(&self.packages[a.0], &self.packages[b.0]));
        ids
    }

    /// What: Insert a parsed package into the catalog.
    ///
    /// Inputs:
    /// - `pkg`: Fully parsed package record whose dependency fields hold
    ///   handles interned by this catalog.
    ///
    /// Output:
    /// - Returns the handle now carrying the record. When an equal
    ///   `(name, version, architecture)` entry already exists, the handle of
    ///   the retained record is returned.
    ///
    /// # Errors
    ///
    /// Returns `IpkToolkitError::InvalidInput` when the record has no name.
    ///
    /// Details:
    /// - Duplicate `(name, version, architecture)` insertions keep the record
    ///   with the higher architecture priority (ties keep the incumbent) and
    ///   back-fill its unset attributes from the discarded record.
    /// - Wires `Provides` into the provided name's `provided_by` set,
    ///   `Replaces` into `replaced_by` (only when the package also conflicts
    ///   with the replaced name), and dependency back-edges into
    ///   `depended_upon_by`.
    pub fn insert(&mut self, pkg: Package) -> Result<PkgId> {
        if pkg.name.is_empty() {
            return Err(IpkToolkitError::InvalidInput(
                "package record has no name".to_string(),
            ));
        }

        let abs_id = self.ensure_abstract(&pkg.name);

        let duplicate = self.abstracts[abs_id.0].pkgs.iter().copied().find(|id| {
            let existing = &self.packages[id.0];
            existing.version == pkg.version && existing.architecture == pkg.architecture
        });

        let pkg_id = if let Some(existing_id) = duplicate {
            let existing = &mut self.packages[existing_id.0];
            if pkg.arch_priority > existing.arch_priority {
                tracing::debug!(
                    "replacing {} {} with higher-priority architecture instance",
                    pkg.name,
                    pkg.version
                );
                let discarded = std::mem::replace(existing, pkg);
                self.packages[existing_id.0].merge_missing_from(discarded);
            } else {
                tracing::debug!(
                    "not replacing {} {}: already have an instance of equal or higher priority",
                    pkg.name,
                    pkg.version
                );
                existing.merge_missing_from(pkg);
            }
            existing_id
        } else {
            let id = PkgId(self.packages.len());
            self.packages.push(pkg);
            self.abstracts[abs_id.0].pkgs.push(id);
            id
        };

        self.normalize_provides(pkg_id, abs_id);
        self.wire_relations(pkg_id, abs_id);
        self.refresh_abstract_state(abs_id);

        Ok(pkg_id)
    }

    /// Ensure the record's provides list leads with its own abstract name.
    fn normalize_provides(&mut self, pkg_id: PkgId, abs_id: AbsId) {
        let provides = &mut self.packages[pkg_id.0].provides;
        if let Some(pos) = provides.iter().position(|p| *p == abs_id) {
            if pos != 0 {
                provides.swap(0, pos);
            }
        } else {
            provides.insert(0, abs_id);
        }
    }

    /// Wire provides, replaces and dependency back-edges for one record.
    fn wire_relations(&mut self, pkg_id: PkgId, abs_id: AbsId) {
        let provides = self.packages[pkg_id.0].provides.clone();
        for provided in provides {
            let entry = &mut self.abstracts[provided.0];
            if !entry.provided_by.contains(&abs_id) {
                entry.provided_by.push(abs_id);
            }
        }

        // A replaces edge only upgrades away the old name when the package
        // also conflicts with it.
        let replaces = self.packages[pkg_id.0].replaces.clone();
        for replaced in replaces {
            if self.packages[pkg_id.0].conflicts_with_abstract(replaced) {
                let entry = &mut self.abstracts[replaced.0];
                if !entry.replaced_by.contains(&abs_id) {
                    entry.replaced_by.push(abs_id);
                }
            }
        }

        let depended: Vec<AbsId> = self.packages[pkg_id.0]
            .depends
            .iter()
            .filter(|dep| {
                matches!(
                    dep.kind,
                    DependKind::Depend | DependKind::PreDepend | DependKind::Recommend
                )
            })
            .flat_map(|dep| dep.possibilities.iter().map(|p| p.abs))
            .collect();
        for target in depended {
            let entry = &mut self.abstracts[target.0];
            if !entry.depended_upon_by.contains(&abs_id) {
                entry.depended_upon_by.push(abs_id);
            }
        }
    }

    /// Lift installedness of a record onto its abstract name.
    fn refresh_abstract_state(&mut self, abs_id: AbsId) {
        let installed = self.abstracts[abs_id.0]
            .pkgs
            .iter()
            .any(|id| self.packages[id.0].state_status == StateStatus::Installed);
        if installed {
            self.abstracts[abs_id.0].state_status = StateStatus::Installed;
        }
    }

    /// What: Render a compound dependency in control-file form.
    ///
    /// Inputs:
    /// - `dep`: Compound dependency whose possibilities hold handles of this
    ///   catalog.
    ///
    /// Output:
    /// - Returns `name (op version)` alternatives joined by ` | `.
    ///
    /// # Example
    ///
    /// ```
    /// use ipk_toolkit::config::Config;
    /// use ipk_toolkit::index::Catalog;
    /// use ipk_toolkit::types::dependency::{
    ///     CompoundDepend, DependKind, Possibility, VersionOp,
    /// };
    ///
    /// let mut catalog = Catalog::new(Config::new());
    /// let abs = catalog.ensure_abstract("libfoo");
    /// let dep = CompoundDepend {
    ///     kind: DependKind::Depend,
    ///     possibilities: vec![Possibility {
    ///         abs,
    ///         constraint: Some((VersionOp::LaterEqual, "2.0".to_string())),
    ///     }],
    /// };
    /// assert_eq!(catalog.depend_to_string(&dep), "libfoo (>= 2.0)");
    /// ```
    #[must_use]
    pub fn depend_to_string(&self, dep: &CompoundDepend) -> String {
        let mut out = String::new();
        for (i, poss) in dep.possibilities.iter().enumerate() {
            if i != 0 {
                out.push_str(" | ");
            }
            out.push_str(&self.abstracts[poss.abs.0].name);
            if let Some((op, version)) = &poss.constraint {
                out.push_str(&format!(" ({op} {version})"));
            }
        }
        out
    }
}

impl Package {
    /// What: Check whether this package's conflicts name an abstract package
    /// directly.
    ///
    /// Inputs:
    /// - `abs`: Abstract package handle.
    ///
    /// Output:
    /// - Returns `true` when any conflicts possibility names `abs`.
    #[must_use]
    pub fn conflicts_with_abstract(&self, abs: AbsId) -> bool {
        self.conflicts
            .iter()
            .flat_map(|dep| dep.possibilities.iter())
            .any(|poss| poss.abs == abs)
    }
}
