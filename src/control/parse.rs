//! Control-paragraph parsing.
//!
//! A control paragraph is a sequence of `Field-Name: value` lines;
//! continuation lines begin with a space and belong to the most recent field;
//! a blank line terminates the paragraph. Field names are matched
//! case-insensitively. A field mask selects which fields are honored, so the
//! same parser serves feed indexes, status databases and extracted control
//! files.

use std::ops::{BitOr, BitOrAssign};

use crate::error::{IpkToolkitError, Result};
use crate::index::Catalog;
use crate::types::dependency::DependKind;
use crate::types::package::{
    set_trimmed, Alternative, Conffile, Package, StateFlags, StateStatus, StateWant,
};
use crate::types::PkgId;
use crate::deps::{parse_depend_field, parse_provides_field, parse_replaces_field, Version};

/// Bitmask selecting the control fields a parse honors.
///
/// Fields outside the mask are skipped without note. Combine masks with `|`;
/// subtract with [`FieldMask::without`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldMask(u32);

impl FieldMask {
    /// No fields.
    pub const NONE: Self = Self(0);
    /// `Package`.
    pub const PACKAGE: Self = Self(1);
    /// `Version`.
    pub const VERSION: Self = Self(1 << 1);
    /// `Architecture`.
    pub const ARCHITECTURE: Self = Self(1 << 2);
    /// `Depends`.
    pub const DEPENDS: Self = Self(1 << 3);
    /// `Pre-Depends`.
    pub const PRE_DEPENDS: Self = Self(1 << 4);
    /// `Recommends`.
    pub const RECOMMENDS: Self = Self(1 << 5);
    /// `Suggests`.
    pub const SUGGESTS: Self = Self(1 << 6);
    /// `Conflicts`.
    pub const CONFLICTS: Self = Self(1 << 7);
    /// `Provides`.
    pub const PROVIDES: Self = Self(1 << 8);
    /// `Replaces`.
    pub const REPLACES: Self = Self(1 << 9);
    /// `Filename`.
    pub const FILENAME: Self = Self(1 << 10);
    /// `Size`.
    pub const SIZE: Self = Self(1 << 11);
    /// `Installed-Size`.
    pub const INSTALLED_SIZE: Self = Self(1 << 12);
    /// `MD5sum` / `MD5Sum`.
    pub const MD5SUM: Self = Self(1 << 13);
    /// `SHA256sum`.
    pub const SHA256SUM: Self = Self(1 << 14);
    /// `Section`.
    pub const SECTION: Self = Self(1 << 15);
    /// `Priority`.
    pub const PRIORITY: Self = Self(1 << 16);
    /// `Maintainer`.
    pub const MAINTAINER: Self = Self(1 << 17);
    /// `Source`.
    pub const SOURCE: Self = Self(1 << 18);
    /// `Tags`.
    pub const TAGS: Self = Self(1 << 19);
    /// `Description` (with continuation lines).
    pub const DESCRIPTION: Self = Self(1 << 20);
    /// `Essential`.
    pub const ESSENTIAL: Self = Self(1 << 21);
    /// `Auto-Installed`.
    pub const AUTO_INSTALLED: Self = Self(1 << 22);
    /// `Installed-Time`.
    pub const INSTALLED_TIME: Self = Self(1 << 23);
    /// `Status`.
    pub const STATUS: Self = Self(1 << 24);
    /// `Conffiles` (with continuation lines).
    pub const CONFFILES: Self = Self(1 << 25);
    /// `Alternatives`.
    pub const ALTERNATIVES: Self = Self(1 << 26);
    /// Every recognized field.
    pub const ALL: Self = Self((1 << 27) - 1);

    /// Whether every bit of `field` is selected.
    #[must_use]
    pub const fn contains(self, field: Self) -> bool {
        self.0 & field.0 == field.0
    }

    /// The mask with the bits of `field` removed.
    #[must_use]
    pub const fn without(self, field: Self) -> Self {
        Self(self.0 & !field.0)
    }
}

impl BitOr for FieldMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Continuation state carried across the lines of one paragraph.
#[derive(Debug, Default)]
struct LineState {
    /// Accumulated `Description` text, set while continuations are expected.
    description: Option<String>,
    /// Whether `Conffiles` continuations are expected.
    reading_conffiles: bool,
}

impl LineState {
    /// Flush an accumulated description into the record and clear both
    /// continuation flags.
    fn flush(&mut self, pkg: &mut Package) {
        if let Some(description) = self.description.take() {
            set_trimmed(&mut pkg.description, &description);
        }
        self.reading_conffiles = false;
    }
}

/// What: Parse one control paragraph into a package record.
///
/// Inputs:
/// - `catalog`: Catalog used to intern abstract names named by dependency
///   fields and to resolve architecture priorities.
/// - `paragraph`: Paragraph text (lines up to, not including, a blank line).
/// - `mask`: Fields to honor; others are skipped.
///
/// Output:
/// - Returns the parsed record. The record is not yet inserted into the
///   catalog; `provides` receives its self-entry at insertion.
///
/// # Errors
///
/// Returns `IpkToolkitError::Parse` when the paragraph carries no `Package`
/// field, and `IpkToolkitError::Field` when the `Package` field is empty.
pub fn parse_package(catalog: &mut Catalog, paragraph: &str, mask: FieldMask) -> Result<Package> {
    let mut pkg = Package::default();
    let mut state = LineState::default();

    for line in paragraph.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(description) = state.description.as_mut() {
                if mask.contains(FieldMask::DESCRIPTION) {
                    description.push('\n');
                    description.push_str(line);
                }
                continue;
            }
            if state.reading_conffiles {
                if mask.contains(FieldMask::CONFFILES) {
                    parse_conffile_line(&mut pkg, line);
                }
                continue;
            }
            // Continuation without a preceding multi-line field
            tracing::debug!("ignoring stray continuation line {:?}", line);
            continue;
        }

        state.flush(&mut pkg);

        let Some((field, value)) = line.split_once(':') else {
            tracing::debug!("ignoring malformed control line {:?}", line);
            continue;
        };
        dispatch_field(catalog, &mut pkg, &mut state, field.trim(), value, mask)?;
    }
    state.flush(&mut pkg);

    if pkg.name.is_empty() {
        // Probably just a blank stretch of input
        return Err(IpkToolkitError::Parse(
            "control paragraph has no Package field".to_string(),
        ));
    }
    Ok(pkg)
}

/// Apply one `Field: value` line to the record.
#[allow(clippy::too_many_lines)]
fn dispatch_field(
    catalog: &mut Catalog,
    pkg: &mut Package,
    state: &mut LineState,
    field: &str,
    value: &str,
    mask: FieldMask,
) -> Result<()> {
    match field.to_ascii_lowercase().as_str() {
        "package" if mask.contains(FieldMask::PACKAGE) => {
            let name = value.trim();
            if name.is_empty() {
                return Err(IpkToolkitError::Field {
                    package: String::new(),
                    field: "Package".to_string(),
                });
            }
            pkg.name = name.to_string();
        }
        "version" if mask.contains(FieldMask::VERSION) => {
            pkg.version = Version::parse(value);
        }
        "architecture" if mask.contains(FieldMask::ARCHITECTURE) => {
            set_trimmed(&mut pkg.architecture, value);
            pkg.arch_priority = pkg
                .architecture
                .as_deref()
                .and_then(|arch| catalog.config().arch_priority(arch))
                .unwrap_or(0);
        }
        "depends" if mask.contains(FieldMask::DEPENDS) => {
            parse_depend_field(catalog, pkg, DependKind::Depend, value);
        }
        "pre-depends" if mask.contains(FieldMask::PRE_DEPENDS) => {
            parse_depend_field(catalog, pkg, DependKind::PreDepend, value);
        }
        "recommends" if mask.contains(FieldMask::RECOMMENDS) => {
            parse_depend_field(catalog, pkg, DependKind::Recommend, value);
        }
        "suggests" if mask.contains(FieldMask::SUGGESTS) => {
            parse_depend_field(catalog, pkg, DependKind::Suggest, value);
        }
        "conflicts" if mask.contains(FieldMask::CONFLICTS) => {
            parse_depend_field(catalog, pkg, DependKind::Conflicts, value);
        }
        "provides" if mask.contains(FieldMask::PROVIDES) => {
            parse_provides_field(catalog, pkg, value);
        }
        "replaces" if mask.contains(FieldMask::REPLACES) => {
            parse_replaces_field(catalog, pkg, value);
        }
        "filename" if mask.contains(FieldMask::FILENAME) => {
            set_trimmed(&mut pkg.filename, value);
        }
        "size" if mask.contains(FieldMask::SIZE) => {
            pkg.size = parse_number(pkg, "Size", value);
        }
        "installed-size" if mask.contains(FieldMask::INSTALLED_SIZE) => {
            pkg.installed_size = parse_number(pkg, "Installed-Size", value);
        }
        "md5sum" if mask.contains(FieldMask::MD5SUM) => {
            set_checksum(&mut pkg.md5sum, &pkg.name, "MD5sum", value, 32);
        }
        "sha256sum" if mask.contains(FieldMask::SHA256SUM) => {
            set_checksum(&mut pkg.sha256sum, &pkg.name, "SHA256sum", value, 64);
        }
        "section" if mask.contains(FieldMask::SECTION) => {
            set_trimmed(&mut pkg.section, value);
        }
        "priority" if mask.contains(FieldMask::PRIORITY) => {
            set_trimmed(&mut pkg.priority, value);
        }
        "maintainer" if mask.contains(FieldMask::MAINTAINER) => {
            set_trimmed(&mut pkg.maintainer, value);
        }
        "source" if mask.contains(FieldMask::SOURCE) => {
            set_trimmed(&mut pkg.source, value);
        }
        "tags" if mask.contains(FieldMask::TAGS) => {
            set_trimmed(&mut pkg.tags, value);
        }
        "description" if mask.contains(FieldMask::DESCRIPTION) => {
            state.description = Some(value.trim().to_string());
        }
        "essential" if mask.contains(FieldMask::ESSENTIAL) => {
            if value.trim() == "yes" {
                pkg.essential = true;
            }
        }
        "auto-installed" if mask.contains(FieldMask::AUTO_INSTALLED) => {
            if value.trim() == "yes" {
                pkg.auto_installed = true;
            }
        }
        "installed-time" if mask.contains(FieldMask::INSTALLED_TIME) => {
            pkg.installed_time = parse_number(pkg, "Installed-Time", value);
        }
        "status" if mask.contains(FieldMask::STATUS) => {
            parse_status_field(pkg, value);
        }
        "conffiles" if mask.contains(FieldMask::CONFFILES) => {
            state.reading_conffiles = true;
        }
        "alternatives" if mask.contains(FieldMask::ALTERNATIVES) => {
            parse_alternatives_field(pkg, value);
        }
        _ => {
            tracing::debug!("ignoring field {:?}", field);
        }
    }
    Ok(())
}

/// Parse an unsigned decimal field; malformed values log and read as 0.
fn parse_number(pkg: &Package, field: &str, value: &str) -> u64 {
    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("invalid {} value {:?} for {}", field, value.trim(), pkg.name);
        0
    })
}

/// Validate and store a hex checksum of the expected width.
fn set_checksum(slot: &mut Option<String>, pkg_name: &str, field: &str, value: &str, width: usize) {
    let value = value.trim();
    if value.len() == width && value.bytes().all(|b| b.is_ascii_hexdigit()) {
        *slot = Some(value.to_string());
    } else {
        tracing::error!("invalid {} {:?} for {}", field, value, pkg_name);
    }
}

/// Parse a `Status` value: want, flag list, status.
fn parse_status_field(pkg: &mut Package, value: &str) {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() != 3 {
        tracing::error!("failed to parse Status line for {}", pkg.name);
        return;
    }
    pkg.state_want = StateWant::from_str_lossy(tokens[0]);
    pkg.state_flag = StateFlags(pkg.state_flag.0 | StateFlags::from_str_lossy(tokens[1]).0);
    pkg.state_status = StateStatus::from_str_lossy(tokens[2]);
}

/// Parse one `Conffiles` continuation line: ` <path> <checksum>`.
fn parse_conffile_line(pkg: &mut Package, line: &str) {
    let mut tokens = line.split_whitespace();
    let (Some(path), Some(checksum), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        tracing::error!("failed to parse Conffiles line for {}", pkg.name);
        return;
    };
    pkg.conffiles.push(Conffile {
        path: path.to_string(),
        checksum: checksum.to_string(),
    });
}

/// Parse an `Alternatives` value: comma-separated `prio:path:altpath`.
fn parse_alternatives_field(pkg: &mut Package, value: &str) {
    for entry in value.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let parts: Vec<&str> = entry.splitn(3, ':').collect();
        let (Some(prio), Some(path), Some(alt_path)) =
            (parts.first(), parts.get(1), parts.get(2))
        else {
            tracing::warn!("malformed Alternatives entry {:?} for {}", entry, pkg.name);
            continue;
        };
        let Ok(prio) = prio.parse::<u32>() else {
            tracing::warn!("malformed Alternatives entry {:?} for {}", entry, pkg.name);
            continue;
        };
        pkg.alternatives.push(Alternative {
            prio,
            path: (*path).to_string(),
            alt_path: (*alt_path).to_string(),
        });
    }
}

/// Split control text into paragraphs at blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Parse a stream of paragraphs, stamp each record, and insert it.
fn parse_records<F>(
    catalog: &mut Catalog,
    text: &str,
    mask: FieldMask,
    mut stamp: F,
) -> Result<Vec<PkgId>>
where
    F: FnMut(&mut Package),
{
    let mut ids = Vec::new();
    for paragraph in paragraphs(text) {
        match parse_package(catalog, &paragraph, mask) {
            Ok(mut pkg) => {
                stamp(&mut pkg);
                ids.push(catalog.insert(pkg)?);
            }
            Err(err) => {
                // The paragraph is abandoned; the rest of the stream parses.
                tracing::warn!("skipping malformed paragraph: {}", err);
            }
        }
    }
    Ok(ids)
}

/// What: Parse a feed index into the catalog.
///
/// Inputs:
/// - `catalog`: Catalog receiving the records.
/// - `text`: Feed index text (blank-line separated paragraphs).
/// - `feed_name`: Name of the feed the records come from.
/// - `mask`: Fields to honor.
///
/// Output:
/// - Returns the handles of the inserted records in feed order. Malformed
///   paragraphs are logged and skipped; the rest of the feed still parses.
///
/// # Errors
///
/// Returns an error when a parsed record cannot be inserted.
///
/// # Example
///
/// ```
/// use ipk_toolkit::config::Config;
/// use ipk_toolkit::control::{parse_feed, FieldMask};
/// use ipk_toolkit::index::Catalog;
///
/// let mut catalog = Catalog::new(Config::new().with_arch("arm", 10));
/// let feed = "Package: busybox\nVersion: 1.36.1-2\nArchitecture: arm\n\n";
/// let ids = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
/// assert_eq!(ids.len(), 1);
/// assert_eq!(catalog.pkg(ids[0]).feed.as_deref(), Some("main"));
/// ```
pub fn parse_feed(
    catalog: &mut Catalog,
    text: &str,
    feed_name: &str,
    mask: FieldMask,
) -> Result<Vec<PkgId>> {
    parse_records(catalog, text, mask, |pkg| {
        pkg.feed = Some(feed_name.to_string());
    })
}

/// What: Parse a status database into the catalog.
///
/// Inputs:
/// - `catalog`: Catalog receiving the records.
/// - `text`: Status database text.
/// - `dest_name`: Name of the destination the database belongs to.
/// - `mask`: Fields to honor.
///
/// Output:
/// - Returns the handles of the inserted records. Malformed paragraphs are
///   logged and skipped.
///
/// # Errors
///
/// Returns an error when a parsed record cannot be inserted.
pub fn parse_status_db(
    catalog: &mut Catalog,
    text: &str,
    dest_name: &str,
    mask: FieldMask,
) -> Result<Vec<PkgId>> {
    parse_records(catalog, text, mask, |pkg| {
        pkg.dest = Some(dest_name.to_string());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn catalog() -> Catalog {
        Catalog::new(Config::new().with_arch("arm", 10))
    }

    const BUSYBOX: &str = "\
Package: busybox
Version: 1:1.36.1-2
Architecture: arm
Maintainer: Example Maintainer <maint@example.org>
Section: base
Priority: required
Essential: yes
Depends: libc, libssl (>= 3.0) | libtls
Provides: sh, awk
Size: 40960
Installed-Size: 102400
MD5sum: 0123456789abcdef0123456789abcdef
Filename: busybox_1.36.1-2_arm.ipk
Description: Tiny versions of common UNIX utilities
 The utilities are combined into a single small
 executable.
";

    #[test]
    fn parses_full_paragraph() {
        let mut catalog = catalog();
        let pkg = parse_package(&mut catalog, BUSYBOX, FieldMask::ALL).expect("parse");

        assert_eq!(pkg.name, "busybox");
        assert_eq!(pkg.version.epoch, 1);
        assert_eq!(pkg.version.upstream, "1.36.1");
        assert_eq!(pkg.version.revision, "2");
        assert_eq!(pkg.architecture.as_deref(), Some("arm"));
        assert_eq!(pkg.arch_priority, 10);
        assert_eq!(pkg.section.as_deref(), Some("base"));
        assert!(pkg.essential);
        assert_eq!(pkg.depends.len(), 2);
        assert_eq!(pkg.depends[1].possibilities.len(), 2);
        assert_eq!(pkg.provides.len(), 2);
        assert_eq!(pkg.size, 40960);
        assert_eq!(pkg.installed_size, 102_400);
        assert_eq!(
            pkg.md5sum.as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
        let description = pkg.description.expect("description expected");
        assert!(description.starts_with("Tiny versions"));
        assert!(description.contains("\n The utilities"));
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let mut catalog = catalog();
        let text = "package: tool\nVERSION: 1.0\nmd5SUM: 0123456789abcdef0123456789abcdef\n";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert_eq!(pkg.name, "tool");
        assert_eq!(pkg.version.upstream, "1.0");
        assert!(pkg.md5sum.is_some());
    }

    #[test]
    fn mask_skips_fields() {
        let mut catalog = catalog();
        let mask = FieldMask::ALL.without(FieldMask::DEPENDS | FieldMask::ESSENTIAL);
        let pkg = parse_package(&mut catalog, BUSYBOX, mask).expect("parse");
        assert!(pkg.depends.is_empty());
        assert!(!pkg.essential);
        // Other fields still parse
        assert_eq!(pkg.name, "busybox");
        assert_eq!(pkg.provides.len(), 2);
    }

    #[test]
    fn paragraph_without_package_is_an_error() {
        let mut catalog = catalog();
        assert!(parse_package(&mut catalog, "Version: 1.0\n", FieldMask::ALL).is_err());
        assert!(parse_package(&mut catalog, "", FieldMask::ALL).is_err());
    }

    #[test]
    fn invalid_checksums_are_rejected() {
        let mut catalog = catalog();
        let text = "Package: tool\nMD5sum: zzz\nSHA256sum: 00ff\n";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert!(pkg.md5sum.is_none());
        assert!(pkg.sha256sum.is_none());
    }

    #[test]
    fn parses_status_triple() {
        let mut catalog = catalog();
        let text = "Package: tool\nVersion: 1.0\nStatus: install hold,user installed\n";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert_eq!(pkg.state_want, StateWant::Install);
        assert!(pkg.state_flag.contains(StateFlags::HOLD));
        assert!(pkg.state_flag.contains(StateFlags::USER));
        assert_eq!(pkg.state_status, StateStatus::Installed);
    }

    #[test]
    fn malformed_status_is_ignored() {
        let mut catalog = catalog();
        let text = "Package: tool\nStatus: install installed\n";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert_eq!(pkg.state_want, StateWant::Unknown);
        assert_eq!(pkg.state_status, StateStatus::NotInstalled);
    }

    #[test]
    fn parses_conffiles_continuations() {
        let mut catalog = catalog();
        let text = "\
Package: tool
Conffiles:
 /etc/tool.conf 0123456789abcdef0123456789abcdef
 /etc/tool.d/extra.conf fedcba9876543210fedcba9876543210
Section: utils
";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert_eq!(pkg.conffiles.len(), 2);
        assert_eq!(pkg.conffiles[0].path, "/etc/tool.conf");
        assert_eq!(
            pkg.conffiles[1].checksum,
            "fedcba9876543210fedcba9876543210"
        );
        // The non-continuation line after the block still dispatched
        assert_eq!(pkg.section.as_deref(), Some("utils"));
    }

    #[test]
    fn description_flushes_on_next_field() {
        let mut catalog = catalog();
        let text = "\
Package: tool
Description: first line
 second line
Section: utils
";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        let description = pkg.description.expect("description expected");
        assert!(description.contains("first line"));
        assert!(description.contains("second line"));
        assert_eq!(pkg.section.as_deref(), Some("utils"));
    }

    #[test]
    fn parses_alternatives_entries() {
        let mut catalog = catalog();
        let text = "Package: tool\nAlternatives: 100:/usr/bin/vi:/usr/libexec/vi-tool, 200:/usr/bin/editor:/usr/libexec/editor-tool\n";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert_eq!(pkg.alternatives.len(), 2);
        assert_eq!(pkg.alternatives[0].prio, 100);
        assert_eq!(pkg.alternatives[0].path, "/usr/bin/vi");
        assert_eq!(pkg.alternatives[1].alt_path, "/usr/libexec/editor-tool");
    }

    #[test]
    fn unknown_architecture_has_zero_priority() {
        let mut catalog = catalog();
        let text = "Package: tool\nArchitecture: mips\n";
        let pkg = parse_package(&mut catalog, text, FieldMask::ALL).expect("parse");
        assert_eq!(pkg.arch_priority, 0);
    }

    #[test]
    fn feed_parses_multiple_paragraphs() {
        let mut catalog = catalog();
        let feed = "\
Package: a
Version: 1.0
Architecture: arm

Package: b
Version: 2.0
Architecture: arm

Version: no-name-here

Package: c
Version: 3.0
Architecture: arm
";
        let ids = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
        // The nameless paragraph is skipped, the rest survive
        assert_eq!(ids.len(), 3);
        assert_eq!(catalog.pkg(ids[0]).name, "a");
        assert_eq!(catalog.pkg(ids[2]).name, "c");
        assert_eq!(catalog.pkg(ids[1]).feed.as_deref(), Some("main"));
    }

    #[test]
    fn status_db_stamps_destination() {
        let mut catalog = catalog();
        let status = "\
Package: tool
Version: 1.0
Architecture: arm
Status: install ok installed
";
        let ids = parse_status_db(&mut catalog, status, "root", FieldMask::ALL).expect("parse");
        assert_eq!(ids.len(), 1);
        let pkg = catalog.pkg(ids[0]);
        assert_eq!(pkg.dest.as_deref(), Some("root"));
        assert_eq!(pkg.state_status, StateStatus::Installed);
    }

    #[test]
    fn duplicate_feed_insert_is_idempotent() {
        let mut catalog = catalog();
        let feed = "Package: tool\nVersion: 1.0\nArchitecture: arm\n\n";
        let first = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
        let second = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
        assert_eq!(first, second);
        assert_eq!(catalog.len(), 1);
    }
}
