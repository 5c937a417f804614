//! Error types for Memoir core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Memoir core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] memoir_storage::StorageError),

    /// A slot payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true if the underlying cause is a full storage medium.
    #[must_use]
    pub fn is_storage_full(&self) -> bool {
        matches!(self, CoreError::Storage(e) if e.is_quota())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_storage::StorageError;

    #[test]
    fn storage_full_detection() {
        let err = CoreError::Storage(StorageError::QuotaExceeded {
            requested: 10,
            limit: 5,
        });
        assert!(err.is_storage_full());

        let err = CoreError::Storage(StorageError::Corrupted("bad slot".into()));
        assert!(!err.is_storage_full());
    }
}
