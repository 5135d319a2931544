//! Dependency parsing, version algebra and resolution.
//!
//! # Overview
//!
//! The deps module provides:
//!
//! - **Version algebra**: `[epoch:]upstream[-revision]` parsing and the
//!   character-class comparison rule with `~` pre-release ordering
//! - **Dependency parsing**: compound dependencies with `|` alternatives,
//!   version constraints and greedy `*` promotion
//! - **Resolution**: the transitive install-set computation with cycle
//!   guarding, plus installed-conflict enumeration with `Replaces` masking
//!
//! # Examples
//!
//! ## Version Comparison
//!
//! ```
//! use std::cmp::Ordering;
//! use ipk_toolkit::deps::compare_versions;
//!
//! assert_eq!(compare_versions("1.0-1", "1.0-2"), Ordering::Less);
//! assert_eq!(compare_versions("1.0~rc1", "1.0"), Ordering::Less);
//! ```
//!
//! ## Resolving a Target
//!
//! ```
//! use ipk_toolkit::config::Config;
//! use ipk_toolkit::control::{parse_feed, FieldMask};
//! use ipk_toolkit::deps::fetch_unsatisfied_dependencies;
//! use ipk_toolkit::index::Catalog;
//!
//! let mut catalog = Catalog::new(Config::new().with_arch("arm", 10));
//! let feed = "Package: app\nVersion: 1.0\nArchitecture: arm\nDepends: lib\n\n\
//!             Package: lib\nVersion: 1.0\nArchitecture: arm\n\n";
//! let ids = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
//! let report = fetch_unsatisfied_dependencies(&catalog, ids[0]);
//! assert_eq!(report.to_install.len(), 1);
//! ```

mod parse;
mod resolve;
mod version;

pub use parse::{
    parse_compound_depend, parse_depend_field, parse_provides_field, parse_replaces_field,
};
pub use resolve::{
    dependence_satisfiable, fetch_conflicts, fetch_unsatisfied_dependencies, package_conflicts,
    package_replaces,
};
pub use version::{compare_version_fragments, compare_versions, Version};

// Re-export the report type next to the function producing it
pub use crate::types::dependency::DependencyResolution;
