//! Rust toolkit for embedded Linux (ipkg-lineage) package management.
//!
//! This crate is the core resolver and metadata engine of a lightweight
//! embedded-system package manager: control-paragraph parsing, an in-memory
//! catalog of concrete and virtual packages, Debian-rule version comparison,
//! candidate selection across feeds and architectures, and transitive
//! dependency resolution with conflict detection.
//!
//! The crate performs no I/O of its own. Feeds and status databases arrive as
//! text, install plans leave as data, and the network/archive/filesystem work
//! is delegated to the collaborator traits in [`external`].
//!
//! # Examples
//!
//! ## Parsing a Feed and Resolving a Package
//!
//! ```
//! use ipk_toolkit::config::Config;
//! use ipk_toolkit::control::{parse_feed, FieldMask};
//! use ipk_toolkit::deps::fetch_unsatisfied_dependencies;
//! use ipk_toolkit::index::Catalog;
//!
//! let mut catalog = Catalog::new(Config::new().with_arch("arm_cortex-a9", 10));
//!
//! let feed = "\
//! Package: dropbear
//! Version: 2022.83-2
//! Architecture: arm_cortex-a9
//! Depends: libc
//!
//! Package: libc
//! Version: 1.2.4
//! Architecture: arm_cortex-a9
//!
//! ";
//! let ids = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("well-formed feed");
//!
//! let report = fetch_unsatisfied_dependencies(&catalog, ids[0]);
//! assert_eq!(report.to_install.len(), 1);
//! assert_eq!(catalog.pkg(report.to_install[0]).name, "libc");
//! ```
//!
//! ## Detecting Conflicts
//!
//! ```
//! use ipk_toolkit::config::Config;
//! use ipk_toolkit::control::{parse_feed, parse_status_db, FieldMask};
//! use ipk_toolkit::deps::fetch_conflicts;
//! use ipk_toolkit::index::Catalog;
//!
//! let mut catalog = Catalog::new(Config::new().with_arch("arm", 10));
//! parse_status_db(
//!     &mut catalog,
//!     "Package: old-tool\nVersion: 1.0\nArchitecture: arm\nStatus: install ok installed\n\n",
//!     "root",
//!     FieldMask::ALL,
//! )
//! .expect("status parses");
//! let ids = parse_feed(
//!     &mut catalog,
//!     "Package: new-tool\nVersion: 2.0\nArchitecture: arm\nConflicts: old-tool\n\n",
//!     "main",
//!     FieldMask::ALL,
//! )
//! .expect("feed parses");
//!
//! let conflicts = fetch_conflicts(&catalog, ids[0]);
//! assert_eq!(conflicts.len(), 1);
//! ```
//!
//! ## Writing Records Back
//!
//! ```
//! use ipk_toolkit::config::Config;
//! use ipk_toolkit::control::{format_status, parse_status_db, FieldMask};
//! use ipk_toolkit::index::Catalog;
//!
//! let mut catalog = Catalog::new(Config::new().with_arch("arm", 10));
//! let ids = parse_status_db(
//!     &mut catalog,
//!     "Package: tool\nVersion: 1.0\nArchitecture: arm\nStatus: install ok installed\n\n",
//!     "root",
//!     FieldMask::ALL,
//! )
//! .expect("status parses");
//! let record = format_status(&catalog, ids[0]);
//! assert!(record.contains("Status: install ok installed"));
//! ```

pub mod config;
pub mod control;
pub mod deps;
pub mod error;
pub mod external;
pub mod index;
pub mod types;

/// Prelude module for convenient imports.
///
/// This module re-exports commonly used types, traits, and functions,
/// allowing you to import everything you need with a single
/// `use ipk_toolkit::prelude::*;`.
pub mod prelude;

// Re-export commonly used types
pub use error::{IpkToolkitError as Error, Result};
pub use index::Catalog;
pub use types::{Package, PkgId};
