//! Version parsing and comparison for dependency resolution.
//!
//! This module implements the Debian-style version algebra used across the
//! catalog and the resolver: `[epoch:]upstream[-revision]` parsing, the
//! character-class comparison rule (with `~` sorting before everything,
//! including the empty string), and constraint evaluation against a parsed
//! version.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::dependency::VersionOp;

/// A parsed package version.
///
/// Versions consist of a numeric epoch (0 when absent), an upstream version
/// string, and a packaging revision (empty when absent). Ordering compares
/// epochs numerically, then the upstream and revision strings under the
/// character-class rule of [`compare_version_fragments`].
///
/// Equality is defined through the comparison, so `1.0` and `1.00` are equal
/// versions even though their spellings differ.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Version {
    /// Epoch prefix; overrides all other components when unequal.
    pub epoch: u32,
    /// Upstream version string.
    pub upstream: String,
    /// Packaging revision following the last `-`; empty when absent.
    pub revision: String,
}

impl Version {
    /// What: Parse a version string of the form `[epoch:]upstream[-revision]`.
    ///
    /// Inputs:
    /// - `s`: Raw version string (surrounding whitespace is ignored).
    ///
    /// Output:
    /// - Returns the parsed `Version`.
    ///
    /// Details:
    /// - The first `:` separates the epoch; a missing epoch parses as 0.
    /// - A malformed epoch is logged at error level and treated as 0, so
    ///   parsing never fails; the remainder still parses normally.
    /// - The last `-` separates the revision; a missing revision is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use ipk_toolkit::deps::Version;
    ///
    /// let v = Version::parse("2:1.4.8-r3");
    /// assert_eq!(v.epoch, 2);
    /// assert_eq!(v.upstream, "1.4.8");
    /// assert_eq!(v.revision, "r3");
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        let (epoch, rest) = match s.find(':') {
            Some(pos) => {
                let epoch = s[..pos].parse::<u32>().unwrap_or_else(|_| {
                    tracing::error!("invalid epoch in version string {:?}", s);
                    0
                });
                (epoch, &s[pos + 1..])
            }
            None => (0, s),
        };

        let (upstream, revision) = match rest.rfind('-') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };

        Self {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.to_string(),
        }
    }

    /// What: Check whether this version satisfies a `(op, bound)` constraint.
    ///
    /// Inputs:
    /// - `op`: Constraint operator.
    /// - `bound`: Constraint version string, parsed leniently.
    ///
    /// Output:
    /// - Returns `true` when `self op bound` holds.
    ///
    /// Details:
    /// - A malformed bound compares through its parsed form; parsing never
    ///   fails, so constraint evaluation is total.
    ///
    /// # Example
    ///
    /// ```
    /// use ipk_toolkit::deps::Version;
    /// use ipk_toolkit::types::dependency::VersionOp;
    ///
    /// let v = Version::parse("1.2.3-1");
    /// assert!(v.satisfies(VersionOp::LaterEqual, "1.2"));
    /// assert!(!v.satisfies(VersionOp::Earlier, "1.2"));
    /// ```
    #[must_use]
    pub fn satisfies(&self, op: VersionOp, bound: &str) -> bool {
        op.matches(self.cmp(&Self::parse(bound)))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:", self.epoch)?;
        }
        f.write_str(&self.upstream)?;
        if !self.revision.is_empty() {
            write!(f, "-{}", self.revision)?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_version_fragments(&self.upstream, &other.upstream))
            .then_with(|| compare_version_fragments(&self.revision, &other.revision))
    }
}

/// Comparison weight of one character position.
///
/// `~` sorts before the end of the string, digits and end-of-string weigh
/// zero, letters weigh their code, and everything else weighs its code
/// shifted past the letters.
fn char_weight(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => c as i32,
        Some(c) => c as i32 + 256,
    }
}

/// What: Compare two version fragments (upstream or revision strings).
///
/// Inputs:
/// - `a`: Left-hand fragment.
/// - `b`: Right-hand fragment.
///
/// Output:
/// - Returns the ordering of `a` relative to `b`.
///
/// Details:
/// - Walks both fragments in lockstep, alternating between a non-digit
///   prefix (compared by per-character weight, where `~` sorts before the
///   end of the string) and a digit run (leading zeros skipped; a longer
///   run wins; equal-length runs are decided by the first differing digit).
/// - Total over arbitrary strings; no input is rejected.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use ipk_toolkit::deps::compare_version_fragments;
///
/// assert_eq!(compare_version_fragments("1.0", "1.1"), Ordering::Less);
/// assert_eq!(compare_version_fragments("1.0~rc1", "1.0"), Ordering::Less);
/// assert_eq!(compare_version_fragments("1.0.0", "1.0"), Ordering::Greater);
/// ```
#[must_use]
pub fn compare_version_fragments(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() || j < b.len() {
        let mut first_diff = 0i32;

        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let wa = char_weight(a.get(i).copied());
            let wb = char_weight(b.get(j).copied());
            if wa != wb {
                return wa.cmp(&wb);
            }
            i += 1;
            j += 1;
        }

        while i < a.len() && a[i] == b'0' {
            i += 1;
        }
        while j < b.len() && b[j] == b'0' {
            j += 1;
        }

        while i < a.len() && a[i].is_ascii_digit() && j < b.len() && b[j].is_ascii_digit() {
            if first_diff == 0 {
                first_diff = i32::from(a[i]) - i32::from(b[j]);
            }
            i += 1;
            j += 1;
        }

        if i < a.len() && a[i].is_ascii_digit() {
            return Ordering::Greater;
        }
        if j < b.len() && b[j].is_ascii_digit() {
            return Ordering::Less;
        }
        if first_diff != 0 {
            return first_diff.cmp(&0);
        }
    }

    Ordering::Equal
}

/// What: Compare two full version strings.
///
/// Inputs:
/// - `a`: Left-hand version string.
/// - `b`: Right-hand version string.
///
/// Output:
/// - Returns `Ordering::Less` if `a < b`, `Ordering::Equal` on a tie, and
///   `Ordering::Greater` if `a > b`.
///
/// Details:
/// - Parses both sides with [`Version::parse`] and compares epochs as
///   integers, then upstream strings, then revisions.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use ipk_toolkit::deps::compare_versions;
///
/// assert_eq!(compare_versions("1.0-1", "1.0-2"), Ordering::Less);
/// assert_eq!(compare_versions("1:0", "2"), Ordering::Greater);
/// assert_eq!(compare_versions("1.0~rc1", "1.0"), Ordering::Less);
/// ```
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}
