//! Contracts of the external collaborators the core delegates to.
//!
//! The core never performs network, archive or filesystem work itself; the
//! installer layer supplies implementations of these traits. All operations
//! are synchronous and report an opaque exit status, mirroring the process
//! exit codes of the tools typically wrapped. Mock implementations make the
//! installer layer testable without touching the system.

use std::path::Path;

use crate::error::Result;

/// Opaque status code returned by external tools; 0 means success.
pub type ExitStatus = i32;

/// Fetches remote artifacts and checks detached signatures.
pub trait Downloader {
    /// Download `url` into the file at `dest`.
    fn download(&self, url: &str, dest: &Path) -> ExitStatus;

    /// Verify `file` against the detached signature `sig`.
    fn verify_signature(&self, file: &Path, sig: &Path) -> ExitStatus;
}

/// Extracts members from a package archive.
pub trait Extractor {
    /// Write the archive's control paragraph to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error when the archive cannot be read.
    fn extract_control(&self, archive: &Path, out: &mut dyn std::io::Write) -> Result<()>;

    /// Write the archive's data-member file list to `out`, one path per line.
    ///
    /// # Errors
    ///
    /// Returns an error when the archive cannot be read.
    fn extract_file_list(&self, archive: &Path, out: &mut dyn std::io::Write) -> Result<()>;
}

/// Filesystem operations performed on the install target.
pub trait Vfs {
    /// Copy a file.
    ///
    /// # Errors
    ///
    /// Returns an error when the copy fails.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    /// Move a file, crossing filesystems when needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the move fails.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create a directory and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error when creation fails.
    fn mkdir_hier(&self, dir: &Path) -> Result<()>;

    /// MD5 checksum of a file, 32 hex characters.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    fn md5(&self, file: &Path) -> Result<String>;

    /// SHA-256 checksum of a file, 64 hex characters.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    fn sha256(&self, file: &Path) -> Result<String>;

    /// Target of a symbolic link.
    ///
    /// # Errors
    ///
    /// Returns an error when the link cannot be read.
    fn read_link(&self, link: &Path) -> Result<std::path::PathBuf>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error when creation fails.
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;

    /// Remove a file or symbolic link.
    ///
    /// # Errors
    ///
    /// Returns an error when removal fails.
    fn unlink(&self, path: &Path) -> Result<()>;

    /// Whether a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Runs maintainer scripts through the shell.
pub trait ScriptRunner {
    /// Run `cmd` as `sh -c cmd` with the given environment on top of the
    /// inherited one. `PKG_ROOT` and `PKG_UPGRADE` are the conventional keys.
    fn run(&self, cmd: &str, env: &[(&str, &str)]) -> ExitStatus;
}
