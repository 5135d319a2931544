//! Candidate selection over the catalog.
//!
//! The selector answers one question: given an abstract name, which concrete
//! package should the installer pick? Candidates come from every provider of
//! the name; held-back and architecture-invisible packages are filtered out,
//! the remaining candidates are partitioned into `(name, architecture)`
//! classes, and the best class winner is chosen by installedness, then
//! architecture priority, then version.

use crate::index::catalog::Catalog;
use crate::types::package::Package;
use crate::types::{AbsId, PkgId};

impl Catalog {
    /// Whether a package's architecture is present in the configured
    /// priority table. Packages with an unknown architecture are invisible
    /// to selection.
    fn arch_visible(&self, pkg: &Package) -> bool {
        pkg.architecture
            .as_deref()
            .is_some_and(|arch| self.config().arch_priority(arch).is_some())
    }

    /// What: Choose the best installation candidate for an abstract name.
    ///
    /// Inputs:
    /// - `abs`: Abstract name to satisfy.
    /// - `predicate`: Additional filter a candidate must pass (typically a
    ///   version-constraint or installedness test).
    /// - `quiet`: Suppresses the not-found log message when `true`.
    ///
    /// Output:
    /// - Returns the chosen package handle, or `None` when no candidate
    ///   passes the filters.
    ///
    /// Details:
    /// - Candidates are the concrete packages of every abstract in the
    ///   name's `provided_by` set (which includes the name itself).
    /// - Held-back packages are excluded unless already installed;
    ///   architecture must appear in the configured priority table.
    /// - Within one `(name, architecture)` class, the highest version
    ///   passing `predicate` represents the class.
    /// - Across classes the winner is picked by: installed first, then
    ///   higher architecture priority, then higher version.
    pub fn fetch_best_installation_candidate<P>(
        &self,
        abs: AbsId,
        predicate: P,
        quiet: bool,
    ) -> Option<PkgId>
    where
        P: Fn(&Package) -> bool,
    {
        // (name, architecture) classes, insertion-ordered for determinism.
        let mut classes: Vec<((String, String), Vec<PkgId>)> = Vec::new();

        for provider in &self.abs(abs).provided_by {
            for pkg_id in &self.abs(*provider).pkgs {
                let pkg = self.pkg(*pkg_id);
                if pkg.is_held() && !pkg.is_installed() {
                    tracing::debug!("skipping held package {} {}", pkg.name, pkg.version);
                    continue;
                }
                if !self.arch_visible(pkg) {
                    tracing::debug!(
                        "skipping {} {}: architecture {:?} not installable",
                        pkg.name,
                        pkg.version,
                        pkg.architecture
                    );
                    continue;
                }
                let key = (
                    pkg.name.clone(),
                    pkg.architecture.clone().unwrap_or_default(),
                );
                if let Some((_, members)) = classes.iter_mut().find(|(k, _)| *k == key) {
                    members.push(*pkg_id);
                } else {
                    classes.push((key, vec![*pkg_id]));
                }
            }
        }

        let mut best: Option<PkgId> = None;
        for (_, members) in classes {
            // Highest version in the class that passes the predicate.
            let mut class_best: Option<PkgId> = None;
            for id in members {
                let pkg = self.pkg(id);
                if !predicate(pkg) {
                    continue;
                }
                match class_best {
                    Some(current) if self.pkg(current).version >= pkg.version => {}
                    _ => class_best = Some(id),
                }
            }
            let Some(candidate) = class_best else {
                continue;
            };

            best = match best {
                None => Some(candidate),
                Some(current) => {
                    if self.prefer_candidate(candidate, current) {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }

        if best.is_none() && !quiet {
            tracing::info!("no installation candidate for {}", self.abs(abs).name);
        }
        best
    }

    /// Cross-class preference: installed beats not installed, then higher
    /// architecture priority, then higher version.
    fn prefer_candidate(&self, challenger: PkgId, incumbent: PkgId) -> bool {
        let a = self.pkg(challenger);
        let b = self.pkg(incumbent);
        if a.is_installed() != b.is_installed() {
            return a.is_installed();
        }
        if a.arch_priority != b.arch_priority {
            return a.arch_priority > b.arch_priority;
        }
        a.version > b.version
    }

    /// What: Find the installed package carrying a name.
    ///
    /// Inputs:
    /// - `name`: Exact package name (virtual names are not followed).
    ///
    /// Output:
    /// - Returns the installed (or unpacked) package of that name, or `None`.
    #[must_use]
    pub fn fetch_installed(&self, name: &str) -> Option<PkgId> {
        let abs = self.abstract_by_name(name)?;
        self.abs(abs)
            .pkgs
            .iter()
            .copied()
            .find(|id| self.pkg(*id).is_installed())
    }

    /// What: List all installed packages.
    ///
    /// Inputs: None.
    ///
    /// Output:
    /// - Returns the installed (or unpacked) packages in deterministic
    ///   name/version/architecture order.
    #[must_use]
    pub fn fetch_all_installed(&self) -> Vec<PkgId> {
        self.sorted_package_ids()
            .into_iter()
            .filter(|id| self.pkg(*id).is_installed())
            .collect()
    }
}
