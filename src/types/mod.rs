//! Core data types for package metadata and dependency resolution.

use serde::{Deserialize, Serialize};

pub mod dependency;
pub mod feed;
pub mod package;

pub use dependency::{CompoundDepend, DependKind, DependencyResolution, Possibility, VersionOp};
pub use feed::{Dest, Feed};
pub use package::{Alternative, Conffile, Package, StateFlags, StateStatus, StateWant};

/// Stable handle of a concrete package inside a catalog arena.
///
/// Handles are plain indices; they are only meaningful for the catalog that
/// issued them and stay valid for that catalog's lifetime (packages are never
/// removed from the arena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PkgId(pub usize);

/// Stable handle of an abstract (possibly virtual) package name inside a
/// catalog arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbsId(pub usize);
