//! Integration tests for the catalog: feed and status parsing, duplicate
//! reconciliation, candidate selection and record writing over realistic
//! multi-paragraph input.

use std::io::{Read as _, Seek as _, Write as _};

use ipk_toolkit::config::Config;
use ipk_toolkit::control::{format_status, parse_feed, parse_status_db, FieldMask};
use ipk_toolkit::error::Result;
use ipk_toolkit::index::Catalog;
use ipk_toolkit::types::StateStatus;

const FEED: &str = "\
Package: busybox
Version: 1.36.1-2
Architecture: arm_cortex-a9
Section: base
Depends: libc
Provides: sh
Filename: busybox_1.36.1-2_arm_cortex-a9.ipk
Size: 40960
MD5Sum: 0123456789abcdef0123456789abcdef

Package: busybox
Version: 1.36.1-2
Architecture: all
Filename: busybox_1.36.1-2_all.ipk
Size: 51200

Package: libc
Version: 1.2.4
Architecture: arm_cortex-a9
Filename: libc_1.2.4_arm_cortex-a9.ipk

Package: dropbear
Version: 2022.83-2
Architecture: arm_cortex-a9
Depends: libc
Filename: dropbear_2022.83-2_arm_cortex-a9.ipk

";

const STATUS: &str = "\
Package: libc
Version: 1.2.4
Architecture: arm_cortex-a9
Status: install ok installed
Installed-Time: 1700000000

";

fn target_config() -> Config {
    Config::new().with_arch("arm_cortex-a9", 10)
}

/// Feed parsing fills the catalog and stamps the feed name on every record.
#[test]
fn test_feed_populates_catalog() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    let ids = parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;

    assert_eq!(ids.len(), 4);
    for id in &ids {
        assert_eq!(catalog.pkg(*id).feed.as_deref(), Some("main"));
    }
    Ok(())
}

/// Every real package name ends up providing itself after parsing.
#[test]
fn test_self_provision_holds_for_all_names() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;

    for name in ["busybox", "libc", "dropbear"] {
        let abs = catalog
            .abstract_by_name(name)
            .unwrap_or_else(|| panic!("{name} should be interned"));
        assert!(
            catalog.abs(abs).provided_by.contains(&abs),
            "{name} should provide itself"
        );
    }
    Ok(())
}

/// Re-parsing the same feed leaves the catalog unchanged, record for record.
#[test]
fn test_duplicate_feed_parse_is_idempotent() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    let first = parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;
    let before: Vec<String> = first
        .iter()
        .map(|id| format_status(&catalog, *id))
        .collect();

    let second = parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;
    assert_eq!(first, second);
    let after: Vec<String> = second
        .iter()
        .map(|id| format_status(&catalog, *id))
        .collect();
    assert_eq!(before, after);
    Ok(())
}

/// The same package at the same version from two architectures collapses to
/// the higher-priority one at selection time.
#[test]
fn test_selector_prefers_target_architecture() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;

    let abs = catalog.abstract_by_name("busybox").expect("interned");
    let best = catalog
        .fetch_best_installation_candidate(abs, |_| true, false)
        .expect("candidate expected");
    assert_eq!(
        catalog.pkg(best).architecture.as_deref(),
        Some("arm_cortex-a9")
    );
    Ok(())
}

/// A status record merges with its feed record: one entry carrying both the
/// installed state and the feed metadata.
#[test]
fn test_status_and_feed_records_merge() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    let status_ids = parse_status_db(&mut catalog, STATUS, "root", FieldMask::ALL)?;
    let feed_ids = parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;

    // The libc feed paragraph landed on the status record
    let libc_feed_id = feed_ids
        .iter()
        .copied()
        .find(|id| catalog.pkg(*id).name == "libc")
        .expect("libc parsed");
    assert_eq!(status_ids[0], libc_feed_id);

    let libc = catalog.pkg(libc_feed_id);
    assert_eq!(libc.state_status, StateStatus::Installed);
    assert_eq!(libc.dest.as_deref(), Some("root"));
    assert_eq!(libc.feed.as_deref(), Some("main"));
    assert_eq!(
        libc.filename.as_deref(),
        Some("libc_1.2.4_arm_cortex-a9.ipk")
    );
    Ok(())
}

/// Installed packages are found by name and listed deterministically.
#[test]
fn test_installed_queries() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    parse_status_db(&mut catalog, STATUS, "root", FieldMask::ALL)?;
    parse_feed(&mut catalog, FEED, "main", FieldMask::ALL)?;

    let installed = catalog.fetch_installed("libc").expect("libc installed");
    assert_eq!(catalog.pkg(installed).name, "libc");
    assert!(catalog.fetch_installed("dropbear").is_none());

    let all = catalog.fetch_all_installed();
    assert_eq!(all, vec![installed]);
    Ok(())
}

/// A status database round-trips through a file on disk, the way the
/// external database layer stores it.
#[test]
fn test_status_db_roundtrips_through_disk() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    let ids = parse_status_db(&mut catalog, STATUS, "root", FieldMask::ALL)?;

    let mut file = tempfile::tempfile()?;
    file.write_all(format_status(&catalog, ids[0]).as_bytes())?;
    file.rewind()?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;

    let mut reread = Catalog::new(target_config());
    let reread_ids = parse_status_db(&mut reread, &text, "root", FieldMask::ALL)?;
    assert_eq!(reread_ids.len(), 1);
    assert_eq!(format_status(&reread, reread_ids[0]), text);
    Ok(())
}

/// Field masks restrict what the parser stores.
#[test]
fn test_field_mask_limits_parse() -> Result<()> {
    let mut catalog = Catalog::new(target_config());
    let mask = FieldMask::PACKAGE | FieldMask::VERSION | FieldMask::ARCHITECTURE;
    let ids = parse_feed(&mut catalog, FEED, "main", mask)?;

    let busybox = catalog.pkg(ids[0]);
    assert_eq!(busybox.name, "busybox");
    assert!(busybox.depends.is_empty());
    assert!(busybox.filename.is_none());
    assert_eq!(busybox.size, 0);
    Ok(())
}
