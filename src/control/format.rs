//! Fixed-order control record writing.
//!
//! Two record forms exist: the full form used for feed indexes and package
//! info, and the shorter status-database form. Both end with a blank line.
//! Absent attributes are omitted entirely, so records round-trip through the
//! parser unchanged.

use std::fmt::Write as _;

use crate::index::Catalog;
use crate::types::dependency::DependKind;
use crate::types::package::Package;
use crate::types::PkgId;

/// Field order of the full record form.
const INFO_FIELDS: &[&str] = &[
    "Package",
    "Version",
    "Depends",
    "Recommends",
    "Suggests",
    "Provides",
    "Replaces",
    "Conflicts",
    "Status",
    "Section",
    "Essential",
    "Architecture",
    "Maintainer",
    "MD5sum",
    "Size",
    "Filename",
    "Conffiles",
    "Source",
    "Description",
    "Installed-Time",
    "Tags",
];

/// Field order of the status-database record form.
const STATUS_FIELDS: &[&str] = &[
    "Package",
    "Version",
    "Depends",
    "Recommends",
    "Suggests",
    "Provides",
    "Replaces",
    "Conflicts",
    "Status",
    "Essential",
    "Architecture",
    "Conffiles",
    "Installed-Time",
    "Auto-Installed",
];

/// What: Render a package in the full record form.
///
/// Inputs:
/// - `catalog`: Catalog the package lives in (resolves abstract names).
/// - `pkg_id`: Package to render.
///
/// Output:
/// - Returns the record text, fields in the fixed order, ending with a blank
///   line.
///
/// # Example
///
/// ```
/// use ipk_toolkit::config::Config;
/// use ipk_toolkit::control::{format_package, parse_feed, FieldMask};
/// use ipk_toolkit::index::Catalog;
///
/// let mut catalog = Catalog::new(Config::new().with_arch("arm", 10));
/// let feed = "Package: tool\nVersion: 1.0\nArchitecture: arm\n\n";
/// let ids = parse_feed(&mut catalog, feed, "main", FieldMask::ALL).expect("parse");
/// let text = format_package(&catalog, ids[0]);
/// assert!(text.starts_with("Package: tool\n"));
/// assert!(text.ends_with("\n\n"));
/// ```
#[must_use]
pub fn format_package(catalog: &Catalog, pkg_id: PkgId) -> String {
    format_record(catalog, pkg_id, INFO_FIELDS)
}

/// What: Render a package in the status-database record form.
///
/// Inputs:
/// - `catalog`: Catalog the package lives in.
/// - `pkg_id`: Package to render.
///
/// Output:
/// - Returns the record text in the shorter status-file field order, ending
///   with a blank line.
#[must_use]
pub fn format_status(catalog: &Catalog, pkg_id: PkgId) -> String {
    format_record(catalog, pkg_id, STATUS_FIELDS)
}

/// Render a record with the given field order.
fn format_record(catalog: &Catalog, pkg_id: PkgId, fields: &[&str]) -> String {
    let mut out = String::new();
    for field in fields {
        formatted_field(&mut out, catalog, pkg_id, field);
    }
    out.push('\n');
    out
}

/// Append one field of a record, or nothing when the attribute is absent.
#[allow(clippy::too_many_lines)]
fn formatted_field(out: &mut String, catalog: &Catalog, pkg_id: PkgId, field: &str) {
    let pkg = catalog.pkg(pkg_id);
    match field {
        "Package" => {
            let _ = writeln!(out, "Package: {}", pkg.name);
        }
        "Version" => {
            let _ = writeln!(out, "Version: {}", pkg.version);
        }
        "Depends" => depend_field(out, catalog, pkg, "Depends", DependKind::Depend),
        "Recommends" => depend_field(out, catalog, pkg, "Recommends", DependKind::Recommend),
        "Suggests" => depend_field(out, catalog, pkg, "Suggests", DependKind::Suggest),
        "Provides" => {
            // The self-entry at index 0 is implied and never written.
            if pkg.provides.len() > 1 {
                out.push_str("Provides:");
                for (i, abs) in pkg.provides.iter().skip(1).enumerate() {
                    if i != 0 {
                        out.push(',');
                    }
                    let _ = write!(out, " {}", catalog.abs(*abs).name);
                }
                out.push('\n');
            }
        }
        "Replaces" => {
            if !pkg.replaces.is_empty() {
                out.push_str("Replaces:");
                for (i, abs) in pkg.replaces.iter().enumerate() {
                    if i != 0 {
                        out.push(',');
                    }
                    let _ = write!(out, " {}", catalog.abs(*abs).name);
                }
                out.push('\n');
            }
        }
        "Conflicts" => {
            if !pkg.conflicts.is_empty() {
                out.push_str("Conflicts:");
                for (i, dep) in pkg.conflicts.iter().enumerate() {
                    if i != 0 {
                        out.push(',');
                    }
                    let Some(poss) = dep.possibilities.first() else {
                        continue;
                    };
                    let _ = write!(out, " {}", catalog.abs(poss.abs).name);
                    if let Some((op, version)) = &poss.constraint {
                        let _ = write!(out, " ({op} {version})");
                    }
                }
                out.push('\n');
            }
        }
        "Status" => {
            let _ = writeln!(
                out,
                "Status: {} {} {}",
                pkg.state_want, pkg.state_flag, pkg.state_status
            );
        }
        "Section" => text_field(out, "Section", pkg.section.as_deref()),
        "Essential" => {
            if pkg.essential {
                out.push_str("Essential: yes\n");
            }
        }
        "Architecture" => text_field(out, "Architecture", pkg.architecture.as_deref()),
        "Maintainer" => text_field(out, "Maintainer", pkg.maintainer.as_deref()),
        "MD5sum" => text_field(out, "MD5Sum", pkg.md5sum.as_deref()),
        "Size" => {
            if pkg.size != 0 {
                let _ = writeln!(out, "Size: {}", pkg.size);
            }
        }
        "Filename" => text_field(out, "Filename", pkg.filename.as_deref()),
        "Conffiles" => {
            if !pkg.conffiles.is_empty() {
                out.push_str("Conffiles:\n");
                for conffile in &pkg.conffiles {
                    let _ = writeln!(out, " {} {}", conffile.path, conffile.checksum);
                }
            }
        }
        "Source" => text_field(out, "Source", pkg.source.as_deref()),
        "Description" => text_field(out, "Description", pkg.description.as_deref()),
        "Installed-Time" => {
            if pkg.installed_time != 0 {
                let _ = writeln!(out, "Installed-Time: {}", pkg.installed_time);
            }
        }
        "Tags" => text_field(out, "Tags", pkg.tags.as_deref()),
        "Auto-Installed" => {
            if pkg.auto_installed {
                out.push_str("Auto-Installed: yes\n");
            }
        }
        _ => {
            tracing::error!("internal error: unknown record field {:?}", field);
        }
    }
}

/// Append a simple text field when the attribute is set.
fn text_field(out: &mut String, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "{field}: {value}");
    }
}

/// Append one dependency field: the records of `kind`, comma-separated.
fn depend_field(out: &mut String, catalog: &Catalog, pkg: &Package, field: &str, kind: DependKind) {
    let mut written = 0;
    for dep in &pkg.depends {
        if dep.kind != kind {
            continue;
        }
        if written == 0 {
            let _ = write!(out, "{field}:");
        } else {
            out.push(',');
        }
        let _ = write!(out, " {}", catalog.depend_to_string(dep));
        written += 1;
    }
    if written > 0 {
        out.push('\n');
    }
}
