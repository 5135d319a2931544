//! Package-related data types: the concrete package record and its
//! installation-state enums.
//!
//! The package record is a typed attribute store: every control field has an
//! explicit, optional slot. String setters trim surrounding whitespace and
//! treat an empty value as absent, so readers never observe padding from the
//! control file.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::deps::Version;
use crate::types::dependency::CompoundDepend;
use crate::types::AbsId;

/// Requested disposition of a package, first token of the `Status` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateWant {
    /// No recorded request.
    #[default]
    Unknown,
    /// The user wants the package installed.
    Install,
    /// The user wants the package removed, keeping configuration.
    Deinstall,
    /// The user wants the package removed including configuration.
    Purge,
}

/// Canonical want-state table; parsing and printing both go through it so
/// status lines round-trip exactly.
const STATE_WANT_MAP: &[(StateWant, &str)] = &[
    (StateWant::Unknown, "unknown"),
    (StateWant::Install, "install"),
    (StateWant::Deinstall, "deinstall"),
    (StateWant::Purge, "purge"),
];

impl StateWant {
    /// What: Parse a want-state token.
    ///
    /// Inputs:
    /// - `s`: Token from a `Status` line.
    ///
    /// Output:
    /// - Returns the matching state; an unknown token is logged at error
    ///   level and maps to `Unknown`.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        for (value, name) in STATE_WANT_MAP {
            if *name == s {
                return *value;
            }
        }
        tracing::error!("unknown want state {:?}", s);
        Self::Unknown
    }
}

impl fmt::Display for StateWant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (value, name) in STATE_WANT_MAP {
            if value == self {
                return f.write_str(name);
            }
        }
        unreachable!()
    }
}

/// Installation status of a package, third token of the `Status` field.
///
/// Transitions are driven by the external installer; this crate only stores
/// and reports the state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateStatus {
    /// Not present on the system.
    #[default]
    NotInstalled,
    /// Payload unpacked, not yet configured.
    Unpacked,
    /// Configuration started but did not finish.
    HalfConfigured,
    /// Fully installed and configured.
    Installed,
    /// Unpack started but did not finish.
    HalfInstalled,
    /// Removed with configuration files left behind.
    ConfigFiles,
    /// Post-installation script failed.
    PostInstFailed,
    /// Removal failed.
    RemovalFailed,
}

/// Canonical status table shared by the parser and the writer.
const STATE_STATUS_MAP: &[(StateStatus, &str)] = &[
    (StateStatus::NotInstalled, "not-installed"),
    (StateStatus::Unpacked, "unpacked"),
    (StateStatus::HalfConfigured, "half-configured"),
    (StateStatus::Installed, "installed"),
    (StateStatus::HalfInstalled, "half-installed"),
    (StateStatus::ConfigFiles, "config-files"),
    (StateStatus::PostInstFailed, "post-inst-failed"),
    (StateStatus::RemovalFailed, "removal-failed"),
];

impl StateStatus {
    /// What: Parse a status token.
    ///
    /// Inputs:
    /// - `s`: Token from a `Status` line.
    ///
    /// Output:
    /// - Returns the matching status; an unknown token is logged at error
    ///   level and maps to `NotInstalled`.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        for (value, name) in STATE_STATUS_MAP {
            if *name == s {
                return *value;
            }
        }
        tracing::error!("unknown status {:?}", s);
        Self::NotInstalled
    }
}

impl fmt::Display for StateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (value, name) in STATE_STATUS_MAP {
            if value == self {
                return f.write_str(name);
            }
        }
        unreachable!()
    }
}

/// Bitset of package state flags, second token of the `Status` field.
///
/// The flag list serializes as a comma-separated string; `ok` stands for the
/// empty set. The two volatile bits (`filelist-changed`, `need-detail`) are
/// transient bookkeeping and are masked out of the serialized form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateFlags(pub u32);

/// Flag-name table; `ok` is handled separately since it names the empty set.
const STATE_FLAG_MAP: &[(StateFlags, &str)] = &[
    (StateFlags::REINSTREQ, "reinstreq"),
    (StateFlags::HOLD, "hold"),
    (StateFlags::REPLACE, "replace"),
    (StateFlags::NOPRUNE, "noprune"),
    (StateFlags::PREFER, "prefer"),
    (StateFlags::OBSOLETE, "obsolete"),
    (StateFlags::USER, "user"),
    (StateFlags::FILELIST_CHANGED, "filelist-changed"),
    (StateFlags::NEED_DETAIL, "need-detail"),
];

impl StateFlags {
    /// Empty flag set, written as `ok`.
    pub const OK: Self = Self(0);
    /// Reinstallation required.
    pub const REINSTREQ: Self = Self(1);
    /// Held back: never selected for upgrade or automatic installation.
    pub const HOLD: Self = Self(1 << 1);
    /// Marked to replace another package.
    pub const REPLACE: Self = Self(1 << 2);
    /// Files must not be pruned on removal.
    pub const NOPRUNE: Self = Self(1 << 3);
    /// Preferred among equal candidates.
    pub const PREFER: Self = Self(1 << 4);
    /// Obsoleted by another package.
    pub const OBSOLETE: Self = Self(1 << 5);
    /// Explicitly requested by the user.
    pub const USER: Self = Self(1 << 6);
    /// File list changed since last write; volatile.
    pub const FILELIST_CHANGED: Self = Self(1 << 7);
    /// Full detail must be loaded for this package; volatile.
    pub const NEED_DETAIL: Self = Self(1 << 8);

    /// Mask of the flags that survive serialization.
    pub const NONVOLATILE: Self = Self(
        Self::REINSTREQ.0
            | Self::HOLD.0
            | Self::REPLACE.0
            | Self::NOPRUNE.0
            | Self::PREFER.0
            | Self::OBSOLETE.0
            | Self::USER.0,
    );

    /// Whether every bit of `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Set the bits of `flag`.
    pub const fn insert(&mut self, flag: Self) {
        self.0 |= flag.0;
    }

    /// Clear the bits of `flag`.
    pub const fn remove(&mut self, flag: Self) {
        self.0 &= !flag.0;
    }

    /// What: Parse a comma-separated flag list.
    ///
    /// Inputs:
    /// - `s`: Flag token from a `Status` line (e.g. `hold,user` or `ok`).
    ///
    /// Output:
    /// - Returns the union of the recognized flags; unrecognized names are
    ///   ignored.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        let mut flags = Self::OK;
        if s == "ok" {
            return flags;
        }
        for part in s.split(',') {
            for (value, name) in STATE_FLAG_MAP {
                if *name == part {
                    flags.insert(*value);
                }
            }
        }
        flags
    }
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let persistent = Self(self.0 & Self::NONVOLATILE.0);
        if persistent == Self::OK {
            return f.write_str("ok");
        }
        let mut first = true;
        for (value, name) in STATE_FLAG_MAP {
            if persistent.contains(*value) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One configuration file owned by a package: path plus the checksum recorded
/// at installation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conffile {
    /// Absolute path of the configuration file.
    pub path: String,
    /// Checksum recorded when the file was installed.
    pub checksum: String,
}

/// One update-alternatives entry: a priority, the public path, and the
/// package-private target the symlink should point at.
///
/// Symlink maintenance itself is performed by an external collaborator; the
/// core only carries the parsed metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    /// Selection priority; the highest installed priority wins the path.
    pub prio: u32,
    /// Public path being provided.
    pub path: String,
    /// Path inside the package that provides the alternative.
    pub alt_path: String,
}

/// A concrete package: one specific version of one named package from one
/// feed (or from the installed-status database).
///
/// Dependency and provides fields hold interned abstract-package handles
/// issued by the owning catalog; they are not meaningful across catalogs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package name.
    pub name: String,
    /// Parsed version.
    pub version: Version,
    /// Architecture string; `None` until parsed.
    pub architecture: Option<String>,
    /// Priority of the architecture in the active configuration; 0 when the
    /// architecture is not configured (such packages are invisible to
    /// candidate selection).
    pub arch_priority: u32,
    /// Name of the feed this record came from, `None` for status records.
    pub feed: Option<String>,
    /// Name of the install destination, `None` when not installed anywhere.
    pub dest: Option<String>,
    /// MD5 checksum of the archive (32 hex characters).
    pub md5sum: Option<String>,
    /// SHA-256 checksum of the archive (64 hex characters).
    pub sha256sum: Option<String>,
    /// Archive size in bytes.
    pub size: u64,
    /// Unpacked size in bytes.
    pub installed_size: u64,
    /// Installation time, Unix epoch seconds.
    pub installed_time: u64,
    /// Feed-assigned priority class (free-form string).
    pub priority: Option<String>,
    /// Section classification.
    pub section: Option<String>,
    /// Maintainer contact.
    pub maintainer: Option<String>,
    /// Human-readable description, possibly multi-line.
    pub description: Option<String>,
    /// Source package name.
    pub source: Option<String>,
    /// Free-form tags.
    pub tags: Option<String>,
    /// Archive path relative to the feed root.
    pub filename: Option<String>,
    /// Local path of a downloaded archive.
    pub local_filename: Option<String>,
    /// Temporary directory the archive was unpacked into.
    pub tmp_unpack_dir: Option<String>,
    /// Configuration files with their recorded checksums.
    pub conffiles: Vec<Conffile>,
    /// Depends/Pre-Depends/Recommends/Suggests records, declaration order.
    pub depends: Vec<CompoundDepend>,
    /// Conflicts records, declaration order.
    pub conflicts: Vec<CompoundDepend>,
    /// Abstract names this package provides (self-name first).
    pub provides: Vec<AbsId>,
    /// Abstract names this package replaces.
    pub replaces: Vec<AbsId>,
    /// Update-alternatives entries.
    pub alternatives: Vec<Alternative>,
    /// Requested disposition.
    pub state_want: StateWant,
    /// State flag bitset.
    pub state_flag: StateFlags,
    /// Installation status.
    pub state_status: StateStatus,
    /// Whether the package is essential and must never be removed.
    pub essential: bool,
    /// Whether the package was installed to satisfy a dependency.
    pub auto_installed: bool,
    /// Whether the package was supplied directly by the user (local file).
    pub provided_by_hand: bool,
    /// Cached installed-file list, populated lazily by external
    /// collaborators; `None` until loaded.
    pub installed_files: Option<Vec<String>>,
}

impl Package {
    /// What: Create an empty package record with the given name.
    ///
    /// Inputs:
    /// - `name`: Package name.
    ///
    /// Output:
    /// - Returns a record with all optional attributes unset and default
    ///   state (`unknown ok not-installed`).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the package is present on the system (fully installed or at
    /// least unpacked). This is the installedness test used by resolution.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        matches!(
            self.state_status,
            StateStatus::Installed | StateStatus::Unpacked
        )
    }

    /// Whether the package is held back from automatic selection.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.state_flag.contains(StateFlags::HOLD)
    }

    /// What: Fill attributes that are unset on `self` from another record.
    ///
    /// Inputs:
    /// - `other`: Record carrying potentially newer information, consumed.
    ///
    /// Output:
    /// - Updates `self` in place; attributes already set keep their value.
    ///
    /// Details:
    /// - Used when a feed record and a status record describe the same
    ///   `(name, version, architecture)`: the retained record absorbs the
    ///   fields only the discarded one knew.
    pub fn merge_missing_from(&mut self, other: Self) {
        if !self.auto_installed {
            self.auto_installed = other.auto_installed;
        }
        if self.feed.is_none() {
            self.feed = other.feed;
        }
        if self.dest.is_none() {
            self.dest = other.dest;
        }
        if self.architecture.is_none() {
            self.architecture = other.architecture;
        }
        if self.arch_priority == 0 {
            self.arch_priority = other.arch_priority;
        }
        if self.section.is_none() {
            self.section = other.section;
        }
        if self.maintainer.is_none() {
            self.maintainer = other.maintainer;
        }
        if self.description.is_none() {
            self.description = other.description;
        }
        if self.depends.is_empty() {
            self.depends = other.depends;
        }
        if self.provides.len() <= 1 {
            self.provides = other.provides;
        }
        if self.conflicts.is_empty() {
            self.conflicts = other.conflicts;
        }
        if self.replaces.is_empty() {
            self.replaces = other.replaces;
        }
        if self.filename.is_none() {
            self.filename = other.filename;
        }
        if self.local_filename.is_none() {
            self.local_filename = other.local_filename;
        }
        if self.tmp_unpack_dir.is_none() {
            self.tmp_unpack_dir = other.tmp_unpack_dir;
        }
        if self.md5sum.is_none() {
            self.md5sum = other.md5sum;
        }
        if self.sha256sum.is_none() {
            self.sha256sum = other.sha256sum;
        }
        if self.size == 0 {
            self.size = other.size;
        }
        if self.installed_size == 0 {
            self.installed_size = other.installed_size;
        }
        if self.priority.is_none() {
            self.priority = other.priority;
        }
        if self.source.is_none() {
            self.source = other.source;
        }
        if self.conffiles.is_empty() {
            self.conffiles = other.conffiles;
        }
        if self.installed_files.is_none() {
            self.installed_files = other.installed_files;
        }
        if !self.essential {
            self.essential = other.essential;
        }
    }

    /// Drop the cached installed-file list; the next consumer reloads it
    /// through the external collaborators.
    pub fn clear_installed_files(&mut self) {
        self.installed_files = None;
    }
}

/// What: Assign a trimmed string attribute.
///
/// Inputs:
/// - `slot`: Attribute slot to assign.
/// - `value`: Raw field value.
///
/// Output:
/// - Stores the trimmed value; a value that trims to nothing leaves the slot
///   untouched.
pub fn set_trimmed(slot: &mut Option<String>, value: &str) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        *slot = Some(trimmed.to_string());
    }
}

/// What: Order two packages by name, then version, then arch priority.
///
/// Inputs:
/// - `a`: Left-hand package.
/// - `b`: Right-hand package.
///
/// Output:
/// - Returns the ordering used for deterministic catalog listings.
#[must_use]
pub fn compare_name_version_arch(a: &Package, b: &Package) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.version.cmp(&b.version))
        .then_with(|| a.arch_priority.cmp(&b.arch_priority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn want_state_roundtrip() {
        for s in ["unknown", "install", "deinstall", "purge"] {
            assert_eq!(StateWant::from_str_lossy(s).to_string(), s);
        }
        assert_eq!(StateWant::from_str_lossy("bogus"), StateWant::Unknown);
    }

    #[test]
    fn status_roundtrip() {
        for s in [
            "not-installed",
            "unpacked",
            "half-configured",
            "installed",
            "half-installed",
            "config-files",
            "post-inst-failed",
            "removal-failed",
        ] {
            assert_eq!(StateStatus::from_str_lossy(s).to_string(), s);
        }
        assert_eq!(
            StateStatus::from_str_lossy("bogus"),
            StateStatus::NotInstalled
        );
    }

    #[test]
    fn flags_roundtrip() {
        assert_eq!(StateFlags::from_str_lossy("ok"), StateFlags::OK);
        assert_eq!(StateFlags::OK.to_string(), "ok");

        let flags = StateFlags::from_str_lossy("hold,user");
        assert!(flags.contains(StateFlags::HOLD));
        assert!(flags.contains(StateFlags::USER));
        assert!(!flags.contains(StateFlags::REINSTREQ));
        assert_eq!(flags.to_string(), "hold,user");
    }

    #[test]
    fn flags_volatile_bits_not_serialized() {
        let mut flags = StateFlags::from_str_lossy("hold");
        flags.insert(StateFlags::NEED_DETAIL);
        flags.insert(StateFlags::FILELIST_CHANGED);
        assert_eq!(flags.to_string(), "hold");

        let mut only_volatile = StateFlags::OK;
        only_volatile.insert(StateFlags::NEED_DETAIL);
        assert_eq!(only_volatile.to_string(), "ok");
    }

    #[test]
    fn flags_insert_remove() {
        let mut flags = StateFlags::OK;
        flags.insert(StateFlags::HOLD);
        assert!(flags.contains(StateFlags::HOLD));
        flags.remove(StateFlags::HOLD);
        assert_eq!(flags, StateFlags::OK);
    }

    #[test]
    fn package_installedness() {
        let mut pkg = Package::new("busybox");
        assert!(!pkg.is_installed());
        pkg.state_status = StateStatus::Unpacked;
        assert!(pkg.is_installed());
        pkg.state_status = StateStatus::Installed;
        assert!(pkg.is_installed());
        pkg.state_status = StateStatus::ConfigFiles;
        assert!(!pkg.is_installed());
    }

    #[test]
    fn set_trimmed_behavior() {
        let mut slot = None;
        set_trimmed(&mut slot, "  base  ");
        assert_eq!(slot.as_deref(), Some("base"));

        set_trimmed(&mut slot, "   ");
        assert_eq!(slot.as_deref(), Some("base"));

        set_trimmed(&mut slot, "net");
        assert_eq!(slot.as_deref(), Some("net"));
    }

    #[test]
    fn merge_missing_fields() {
        let mut status_rec = Package::new("busybox");
        status_rec.version = Version::parse("1.36.1-2");
        status_rec.state_status = StateStatus::Installed;
        status_rec.dest = Some("root".to_string());

        let mut feed_rec = Package::new("busybox");
        feed_rec.version = Version::parse("1.36.1-2");
        feed_rec.feed = Some("main".to_string());
        feed_rec.filename = Some("busybox_1.36.1-2_arm.ipk".to_string());
        feed_rec.size = 40960;
        feed_rec.md5sum = Some("0".repeat(32));

        status_rec.merge_missing_from(feed_rec);
        assert_eq!(status_rec.feed.as_deref(), Some("main"));
        assert_eq!(status_rec.dest.as_deref(), Some("root"));
        assert_eq!(status_rec.size, 40960);
        assert_eq!(status_rec.state_status, StateStatus::Installed);
    }

    #[test]
    fn ordering_by_name_version_arch() {
        let mut a = Package::new("abc");
        a.version = Version::parse("1.0");
        let mut b = Package::new("abc");
        b.version = Version::parse("1.1");
        assert_eq!(compare_name_version_arch(&a, &b), Ordering::Less);

        b.version = Version::parse("1.0");
        b.arch_priority = 10;
        assert_eq!(compare_name_version_arch(&a, &b), Ordering::Less);

        let z = Package::new("zlib");
        assert_eq!(compare_name_version_arch(&a, &z), Ordering::Less);
    }
}
