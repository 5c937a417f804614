//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level slot store for Memoir.
///
/// Storage backends are **opaque byte stores** keyed by string. They provide
/// simple operations for reading, writing, and removing slots. Memoir owns
/// all payload interpretation - backends do not understand snapshot
/// envelopes, version histories, or documents.
///
/// # Invariants
///
/// - `get` returns exactly the bytes most recently `put` under that key
/// - `put` is durable before it returns: callers treat a successful return
///   as confirmation that the slot survives process termination
/// - `remove` of an absent key is not an error
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the slot for `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Writes `bytes` as the new contents of the slot for `key`.
    ///
    /// Replaces any previous contents. After this returns successfully the
    /// write is durable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::QuotaExceeded`] if the medium rejects
    /// the write, or an I/O error.
    fn put(&self, key: &str, bytes: &[u8]) -> StorageResult<()>;

    /// Removes the slot for `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Returns true if a slot exists for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Lists all keys with a slot, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be enumerated.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
