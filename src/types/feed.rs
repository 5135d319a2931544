//! Feed and destination descriptors owned by the configuration.

use serde::{Deserialize, Serialize};

/// A named package feed: a remote or local repository producing package
/// index paragraphs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Feed name, referenced by package records.
    pub name: String,
    /// Base URL or filesystem path of the feed.
    pub url: String,
    /// Whether the feed index is gzip-compressed.
    #[serde(default)]
    pub gzip: bool,
    /// Whether the feed carries a trusted signature.
    #[serde(default)]
    pub trusted: bool,
}

impl Feed {
    /// What: Create a plain uncompressed, unsigned feed.
    ///
    /// Inputs:
    /// - `name`: Feed name.
    /// - `url`: Base URL or path.
    ///
    /// Output:
    /// - Returns the feed descriptor with `gzip` and `trusted` unset.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            gzip: false,
            trusted: false,
        }
    }
}

/// A named installation destination on the target filesystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dest {
    /// Destination name, referenced by package records.
    pub name: String,
    /// Root directory packages are installed under.
    pub root_dir: String,
    /// Directory holding per-package control metadata.
    pub info_dir: String,
    /// Path of the status database file for this destination.
    pub status_file: String,
}

impl Dest {
    /// What: Create a destination rooted at `root_dir` with the conventional
    /// metadata layout beneath it.
    ///
    /// Inputs:
    /// - `name`: Destination name.
    /// - `root_dir`: Filesystem root for installs.
    ///
    /// Output:
    /// - Returns the descriptor with `info_dir` and `status_file` derived
    ///   from the root.
    #[must_use]
    pub fn new(name: impl Into<String>, root_dir: impl Into<String>) -> Self {
        let root_dir = root_dir.into();
        let info_dir = format!("{root_dir}/usr/lib/ipk/info");
        let status_file = format!("{root_dir}/usr/lib/ipk/status");
        Self {
            name: name.into(),
            root_dir,
            info_dir,
            status_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_constructor() {
        let feed = Feed::new("main", "http://feeds.example.org/arm");
        assert_eq!(feed.name, "main");
        assert!(!feed.gzip);
        assert!(!feed.trusted);
    }

    #[test]
    fn dest_derives_layout() {
        let dest = Dest::new("root", "/");
        assert_eq!(dest.root_dir, "/");
        assert!(dest.info_dir.ends_with("ipk/info"));
        assert!(dest.status_file.ends_with("ipk/status"));
    }

    #[test]
    fn serde_roundtrip() {
        let feed = Feed {
            name: "main".to_string(),
            url: "http://feeds.example.org/arm".to_string(),
            gzip: true,
            trusted: false,
        };
        let json = serde_json::to_string(&feed).expect("serialization should succeed");
        let back: Feed = serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(feed, back);
    }
}
