//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during save and replication operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local store error (commit, history, or restore).
    #[error("local store error: {0}")]
    Core(#[from] memoir_core::CoreError),

    /// A remote call failed.
    #[error("network error: {message}")]
    Network {
        /// What the remote or transport reported.
        message: String,
    },

    /// A remote call exceeded the caller-supplied timeout.
    ///
    /// Treated identically to [`SyncError::Network`] by the engine: the
    /// replication status flips to error and the local save stands.
    #[error("remote call timed out")]
    Timeout,

    /// The engine has no active storage key; nothing can be committed.
    #[error("no active storage key")]
    NoActiveKey,

    /// A remote-only operation was invoked with no remote attached.
    #[error("no remote service attached")]
    RemoteDisabled,
}

impl SyncError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Returns true if this error came from the replication path rather
    /// than the local store.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Network { .. } | SyncError::Timeout)
    }

    /// Returns true if the underlying cause is a full local medium.
    #[must_use]
    pub fn is_storage_full(&self) -> bool {
        matches!(self, SyncError::Core(e) if e.is_storage_full())
    }
}
