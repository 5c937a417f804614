//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The medium rejected a write because it would exceed its capacity.
    #[error("quota exceeded: write of {requested} bytes over limit of {limit}")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        requested: u64,
        /// The configured capacity in bytes.
        limit: u64,
    },

    /// A slot holds data that cannot be interpreted.
    #[error("storage corrupted: {0}")]
    Corrupted(String),

    /// The key is empty or not representable on the medium.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    /// Returns true if this error means the medium is full.
    ///
    /// Callers use this to distinguish a recoverable "free some space"
    /// condition from corruption or I/O faults.
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_display() {
        let err = StorageError::QuotaExceeded {
            requested: 2048,
            limit: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
        assert!(err.is_quota());
    }

    #[test]
    fn io_error_is_not_quota() {
        let err = StorageError::Io(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert!(!err.is_quota());
    }
}
