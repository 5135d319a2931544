//! Unified error type for ipk-toolkit.

use thiserror::Error;

/// Unified error type for all ipk-toolkit operations.
///
/// This error type covers all possible failure modes across different modules,
/// providing clear, actionable error messages. The resolver and the selector
/// never return errors for unsatisfied or conflicting dependencies; those are
/// reported as data alongside partial results.
#[derive(Error, Debug)]
pub enum IpkToolkitError {
    /// I/O error from an external collaborator, surfaced verbatim.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed control field; the paragraph it belongs to is abandoned.
    #[error("Malformed field {field} in package {package}")]
    Field {
        /// Name of the package whose paragraph failed (may be empty when the
        /// failure happens before Package: was seen).
        package: String,
        /// Canonical name of the offending field.
        field: String,
    },

    /// Custom parsing error with message.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Downloaded or cached artifact failed a size or checksum check.
    #[error("Integrity failure: {0}")]
    Integrity(String),

    /// Package not found.
    #[error("Package not found")]
    NotFound,

    /// Invalid input parameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for ipk-toolkit operations.
pub type Result<T> = std::result::Result<T, IpkToolkitError>;
