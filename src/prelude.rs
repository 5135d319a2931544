//! Convenient re-exports of the crate's most used items.

pub use crate::config::Config;
pub use crate::control::{
    format_package, format_status, parse_feed, parse_package, parse_status_db, FieldMask,
};
pub use crate::deps::{
    compare_versions, fetch_conflicts, fetch_unsatisfied_dependencies, DependencyResolution,
    Version,
};
pub use crate::error::{IpkToolkitError, Result};
pub use crate::index::{AbstractPkg, Catalog};
pub use crate::types::{
    AbsId, CompoundDepend, DependKind, Dest, Feed, Package, PkgId, Possibility, StateFlags,
    StateStatus, StateWant, VersionOp,
};
