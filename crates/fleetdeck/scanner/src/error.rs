//! Error types for the scanner crate.

use thiserror::Error;

/// Errors that can occur during a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The vision transport call failed.
    #[error("vision transport error: {0}")]
    Transport(String),

    /// The vision credential was rejected.
    #[error("vision credential rejected: {0}")]
    Auth(String),

    /// The model answered with something that is not the expected JSON.
    #[error("unreadable model output: {0}")]
    Malformed(String),

    /// Scan log I/O failed.
    #[error("scan log error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scanner operations.
pub type ScanResult<T> = std::result::Result<T, ScanError>;
