//! Durable local key-value store with bounded version history.

use crate::document::Document;
use crate::error::CoreResult;
use crate::snapshot::Snapshot;
use memoir_storage::StorageBackend;
use tracing::debug;

/// Snapshots kept per key when no other limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Suffix of the slot holding a key's bounded history.
const VERSIONS_SUFFIX: &str = "::versions";

/// A durable local store keeping, per key, a current value and a bounded
/// append-only history of [`Snapshot`]s.
///
/// Layout on the backend: key `k` has a current slot `k` holding one
/// snapshot envelope, and a history slot `k::versions` holding the last N
/// envelopes most-recent-first.
///
/// # Invariants
///
/// - `history(k)[0].version > history(k)[1].version > ...`
/// - `history(k).len() <= history_limit` after any number of commits
/// - A commit is durable before `commit` returns
/// - `restore` rewrites the current slot without touching history
pub struct VersionedLocalStore {
    backend: Box<dyn StorageBackend>,
    history_limit: usize,
}

impl VersionedLocalStore {
    /// Creates a store over `backend` with the default history limit.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_history_limit(backend, DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a store keeping at most `history_limit` snapshots per key.
    ///
    /// A limit of zero is treated as one: the most recent commit is always
    /// recoverable.
    #[must_use]
    pub fn with_history_limit(backend: Box<dyn StorageBackend>, history_limit: usize) -> Self {
        Self {
            backend,
            history_limit: history_limit.max(1),
        }
    }

    /// The configured history bound.
    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    fn versions_key(key: &str) -> String {
        format!("{key}{VERSIONS_SUFFIX}")
    }

    /// Commits `data` as the new current value for `key`.
    ///
    /// Wraps the document in a fresh [`Snapshot`] whose version is strictly
    /// greater than the previous one for this key, writes the current slot,
    /// and prepends to the history slot, truncating to the limit. Both
    /// writes are durable before this returns.
    ///
    /// # Errors
    ///
    /// Surfaces backend failures (notably quota exhaustion) and codec
    /// errors; on error the caller must treat the commit as not having
    /// happened.
    pub fn commit(&self, key: &str, data: &Document) -> CoreResult<Snapshot> {
        let mut history = self.history(key)?;
        let previous_version = history.first().map(|s| s.version);
        let snapshot = Snapshot::capture(data.clone(), previous_version);

        self.backend
            .put(key, &serde_json::to_vec(&snapshot)?)?;

        history.insert(0, snapshot.clone());
        history.truncate(self.history_limit);
        self.backend
            .put(&Self::versions_key(key), &serde_json::to_vec(&history)?)?;

        debug!(key, version = snapshot.version, "committed snapshot");
        Ok(snapshot)
    }

    /// Reads the most recent committed value for `key`, or `None` if the
    /// key was never committed.
    ///
    /// Slots written by releases that stored a bare document without the
    /// snapshot envelope are still readable.
    ///
    /// # Errors
    ///
    /// Returns a codec error if the slot holds neither format.
    pub fn read(&self, key: &str) -> CoreResult<Option<Document>> {
        let Some(bytes) = self.backend.get(key)? else {
            return Ok(None);
        };

        // Try the envelope first: a bare Document would also accept an
        // envelope object since all its fields are defaulted.
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot.data)),
            Err(_) => Ok(Some(serde_json::from_slice::<Document>(&bytes)?)),
        }
    }

    /// Returns the history for `key`, most-recent-first, at most the
    /// configured limit. Reading never mutates history.
    ///
    /// # Errors
    ///
    /// Surfaces backend and codec failures.
    pub fn history(&self, key: &str) -> CoreResult<Vec<Snapshot>> {
        match self.backend.get(&Self::versions_key(key))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Makes `snapshot` the current value for `key` without removing it
    /// from history, and returns its document.
    ///
    /// This is same-key time travel: history is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Surfaces backend and codec failures.
    pub fn restore(&self, key: &str, snapshot: &Snapshot) -> CoreResult<Document> {
        self.backend
            .put(key, &serde_json::to_vec(snapshot)?)?;
        debug!(key, version = snapshot.version, "restored snapshot");
        Ok(snapshot.data.clone())
    }

    /// Removes the current value and the entire history for `key`.
    ///
    /// # Errors
    ///
    /// Surfaces backend failures.
    pub fn purge(&self, key: &str) -> CoreResult<()> {
        self.backend.remove(key)?;
        self.backend.remove(&Self::versions_key(key))?;
        debug!(key, "purged key");
        Ok(())
    }
}
