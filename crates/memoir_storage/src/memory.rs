//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory slot store.
///
/// This backend stores all slots in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral sessions that don't need persistence
///
/// An optional byte quota lets tests provoke
/// [`StorageError::QuotaExceeded`], the condition a browser-style medium
/// raises when it is full.
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use memoir_storage::{StorageBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.put("greeting", b"hello").unwrap();
/// assert_eq!(backend.get("greeting").unwrap().unwrap(), b"hello");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    slots: RwLock<BTreeMap<String, Vec<u8>>>,
    quota: Option<u64>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects writes once total stored bytes would
    /// exceed `limit`.
    ///
    /// Useful for testing the storage-full path.
    #[must_use]
    pub fn with_quota(limit: u64) -> Self {
        Self {
            slots: RwLock::new(BTreeMap::new()),
            quota: Some(limit),
        }
    }

    /// Returns the total number of bytes currently stored.
    #[must_use]
    pub fn used_bytes(&self) -> u64 {
        self.slots.read().values().map(|v| v.len() as u64).sum()
    }

    /// Clears all slots.
    pub fn clear(&self) {
        self.slots.write().clear();
    }
}

fn check_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        check_key(key)?;
        Ok(self.slots.read().get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        check_key(key)?;
        let mut slots = self.slots.write();

        if let Some(limit) = self.quota {
            let others: u64 = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let requested = others + bytes.len() as u64;
            if requested > limit {
                return Err(StorageError::QuotaExceeded { requested, limit });
            }
        }

        slots.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        check_key(key)?;
        self.slots.write().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        check_key(key)?;
        Ok(self.slots.read().contains_key(key))
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.slots.read().keys().cloned().collect())
    }
}
