//! Dependency-related data types for dependency resolution operations.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AbsId, PkgId};

/// Version constraint operator attached to one dependency possibility.
///
/// The two-character forms `<<` and `>>` are the strict comparisons; the
/// historic one-character forms `<` and `>` are accepted on parse as synonyms
/// for `<=` and `>=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionOp {
    /// Strictly earlier (`<<`).
    Earlier,
    /// Earlier or equal (`<=`).
    EarlierEqual,
    /// Exactly equal (`=`).
    Equal,
    /// Later or equal (`>=`).
    LaterEqual,
    /// Strictly later (`>>`).
    Later,
}

impl VersionOp {
    /// What: Check whether a comparison outcome satisfies this operator.
    ///
    /// Inputs:
    /// - `ord`: Ordering of the candidate version relative to the constraint
    ///   version.
    ///
    /// Output:
    /// - Returns `true` when the ordering satisfies the operator.
    #[must_use]
    pub const fn matches(self, ord: Ordering) -> bool {
        match self {
            Self::Earlier => matches!(ord, Ordering::Less),
            Self::EarlierEqual => !matches!(ord, Ordering::Greater),
            Self::Equal => matches!(ord, Ordering::Equal),
            Self::LaterEqual => !matches!(ord, Ordering::Less),
            Self::Later => matches!(ord, Ordering::Greater),
        }
    }

    /// What: Parse a constraint operator from the front of a token.
    ///
    /// Inputs:
    /// - `token`: Constraint text, operator first (e.g. `>= 1.2`).
    ///
    /// Output:
    /// - Returns the operator and the remaining text, or `None` when the
    ///   token does not start with a recognized operator.
    ///
    /// Details:
    /// - Recognizes `<<`, `<=`, `>=`, `>>`, `=`, plus the legacy single
    ///   `<`/`>` forms mapped to `<=`/`>=`.
    #[must_use]
    pub fn strip_from(token: &str) -> Option<(Self, &str)> {
        if let Some(rest) = token.strip_prefix("<<") {
            Some((Self::Earlier, rest))
        } else if let Some(rest) = token.strip_prefix("<=") {
            Some((Self::EarlierEqual, rest))
        } else if let Some(rest) = token.strip_prefix(">=") {
            Some((Self::LaterEqual, rest))
        } else if let Some(rest) = token.strip_prefix(">>") {
            Some((Self::Later, rest))
        } else if let Some(rest) = token.strip_prefix('=') {
            Some((Self::Equal, rest))
        } else if let Some(rest) = token.strip_prefix('<') {
            // Deprecated designations, kept for compatibility with old feeds
            Some((Self::EarlierEqual, rest))
        } else if let Some(rest) = token.strip_prefix('>') {
            Some((Self::LaterEqual, rest))
        } else {
            None
        }
    }
}

impl fmt::Display for VersionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Earlier => "<",
            Self::EarlierEqual => "<=",
            Self::Equal => "=",
            Self::LaterEqual => ">=",
            Self::Later => ">",
        };
        f.write_str(s)
    }
}

/// Kind of a compound dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependKind {
    /// Regular runtime dependency.
    Depend,
    /// Dependency that must be configured before unpacking.
    PreDepend,
    /// Recommended companion; failure to satisfy is never fatal.
    Recommend,
    /// Suggested companion; mentioned, never enforced.
    Suggest,
    /// Mutual exclusion with the named packages.
    Conflicts,
    /// Starred dependency: all trivially installable satisfiers are wanted.
    GreedyDepend,
}

impl DependKind {
    /// Whether an unsatisfied dependency of this kind is only advisory.
    #[must_use]
    pub const fn is_advisory(self) -> bool {
        matches!(self, Self::Recommend | Self::Suggest)
    }
}

/// One alternative inside a compound dependency: an abstract name plus an
/// optional version constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Possibility {
    /// Abstract package this possibility names.
    pub abs: AbsId,
    /// Version constraint, `None` when any version satisfies.
    pub constraint: Option<(VersionOp, String)>,
}

impl Possibility {
    /// What: Create an unconstrained possibility.
    ///
    /// Inputs:
    /// - `abs`: Abstract package handle.
    ///
    /// Output:
    /// - Returns a `Possibility` with no version constraint.
    #[must_use]
    pub const fn any(abs: AbsId) -> Self {
        Self {
            abs,
            constraint: None,
        }
    }

    /// What: Check whether a version satisfies this possibility's constraint.
    ///
    /// Inputs:
    /// - `version`: Candidate package version.
    ///
    /// Output:
    /// - Returns `true` when unconstrained or when the constraint holds.
    #[must_use]
    pub fn constraint_satisfied(&self, version: &crate::deps::Version) -> bool {
        match &self.constraint {
            None => true,
            Some((op, bound)) => version.satisfies(*op, bound),
        }
    }
}

/// A compound dependency: a disjunction of possibilities treated as a single
/// requirement of the declaring package.
///
/// The possibilities list is non-empty for every parsed record; declaration
/// order is preserved and meaningful (earlier alternatives win ties).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundDepend {
    /// Requirement kind.
    pub kind: DependKind,
    /// Alternatives, in declaration order.
    pub possibilities: Vec<Possibility>,
}

/// Result of a transitive dependency resolution for one target package.
///
/// `to_install` lists the additional packages the installer must schedule, in
/// dependency-before-dependent order; `unresolved` carries a printable form
/// of every hard requirement that no candidate could satisfy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyResolution {
    /// Packages to install besides the target, insertion-ordered and
    /// deduplicated by name, version and architecture.
    pub to_install: Vec<PkgId>,
    /// Printable forms of dependencies that could not be satisfied at all.
    pub unresolved: Vec<String>,
}

impl DependencyResolution {
    /// Whether every hard requirement was satisfied.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.unresolved.is_empty()
    }
}
