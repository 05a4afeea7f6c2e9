//! Error types for scan operations.

use thiserror::Error;

/// Errors that can occur while scanning.
///
/// Broken components are never errors: they are reported as findings.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root handle does not resolve to an object.
    #[error("unknown scene object: {0}")]
    UnknownNode(String),

    /// The asset loader has no asset with this identifier.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// A scene description could not be decoded.
    #[error("invalid scene description: {0}")]
    InvalidScene(String),

    /// I/O error while loading a scene description.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for scan operations.
pub type ScanResult<T> = std::result::Result<T, ScanError>;
