//! Runtime configuration: architecture priorities, feeds and destinations.
//!
//! The configuration is an explicit context value handed to the catalog at
//! construction time, so independent catalogs (and tests) never share state.

use serde::{Deserialize, Serialize};

use crate::types::{Dest, Feed};

/// One entry of the architecture priority table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchPriority {
    /// Architecture name (e.g. `arm_cortex-a9`, `all`, `noarch`).
    pub name: String,
    /// Numeric weight; higher wins among equal-version candidates.
    pub priority: u32,
}

/// Runtime configuration for a catalog.
///
/// Holds the ordered architecture priority table plus the feed and
/// destination descriptors package records refer to by name. Packages whose
/// architecture does not appear in the table are invisible to candidate
/// selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ordered architecture priority table.
    pub arch_list: Vec<ArchPriority>,
    /// Known feeds.
    pub feeds: Vec<Feed>,
    /// Known install destinations.
    pub dests: Vec<Dest>,
}

impl Default for Config {
    fn default() -> Self {
        // `all` and `noarch` are always installable; a concrete target
        // architecture is expected to be registered on top with a higher
        // priority.
        Self {
            arch_list: vec![
                ArchPriority {
                    name: "all".to_string(),
                    priority: 1,
                },
                ArchPriority {
                    name: "noarch".to_string(),
                    priority: 1,
                },
            ],
            feeds: Vec::new(),
            dests: Vec::new(),
        }
    }
}

impl Config {
    /// What: Create a configuration with the default architecture table.
    ///
    /// Inputs: None.
    ///
    /// Output:
    /// - Returns a configuration knowing only `all` and `noarch`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Register an architecture with a priority, chaining.
    ///
    /// Inputs:
    /// - `name`: Architecture name.
    /// - `priority`: Selection weight; higher wins.
    ///
    /// Output:
    /// - Returns `self` for chaining.
    ///
    /// Details:
    /// - Re-registering an existing name overwrites its priority in place.
    #[must_use]
    pub fn with_arch(mut self, name: impl Into<String>, priority: u32) -> Self {
        self.register_arch(name, priority);
        self
    }

    /// What: Register an architecture with a priority.
    ///
    /// Inputs:
    /// - `name`: Architecture name.
    /// - `priority`: Selection weight; higher wins.
    ///
    /// Output:
    /// - Updates the priority table in place.
    pub fn register_arch(&mut self, name: impl Into<String>, priority: u32) {
        let name = name.into();
        if let Some(entry) = self.arch_list.iter_mut().find(|a| a.name == name) {
            entry.priority = priority;
        } else {
            self.arch_list.push(ArchPriority { name, priority });
        }
    }

    /// What: Add a feed descriptor, chaining.
    ///
    /// Inputs:
    /// - `feed`: Feed to add.
    ///
    /// Output:
    /// - Returns `self` for chaining.
    #[must_use]
    pub fn with_feed(mut self, feed: Feed) -> Self {
        self.feeds.push(feed);
        self
    }

    /// What: Add a destination descriptor, chaining.
    ///
    /// Inputs:
    /// - `dest`: Destination to add.
    ///
    /// Output:
    /// - Returns `self` for chaining.
    #[must_use]
    pub fn with_dest(mut self, dest: Dest) -> Self {
        self.dests.push(dest);
        self
    }

    /// What: Look up the priority of an architecture.
    ///
    /// Inputs:
    /// - `arch`: Architecture name.
    ///
    /// Output:
    /// - Returns the configured priority, or `None` when the architecture is
    ///   not registered (such packages are invisible to selection).
    #[must_use]
    pub fn arch_priority(&self, arch: &str) -> Option<u32> {
        self.arch_list
            .iter()
            .find(|a| a.name == arch)
            .map(|a| a.priority)
    }

    /// Look up a feed by name.
    #[must_use]
    pub fn feed(&self, name: &str) -> Option<&Feed> {
        self.feeds.iter().find(|f| f.name == name)
    }

    /// Look up a destination by name.
    #[must_use]
    pub fn dest(&self, name: &str) -> Option<&Dest> {
        self.dests.iter().find(|d| d.name == name)
    }
}
