//! Remote replication service abstraction.

use crate::error::{SyncError, SyncResult};
use memoir_core::Document;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::time::Duration;

/// A named blob stored with the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// Blob name, unique per user.
    pub name: String,
    /// Download URL.
    pub url: String,
}

/// The remote replication and blob service Memoir pushes to.
///
/// This trait abstracts the account provider's data plane, allowing for
/// different implementations (HTTP, cloud SDK, mock for testing, etc.).
///
/// Implementations must honor the caller-supplied `timeout` on every call
/// and map expiry to [`SyncError::Timeout`]; the engine treats a timeout
/// identically to any other network failure and never leaves a call pending
/// indefinitely.
pub trait RemoteService: Send + Sync {
    /// Replicates `document` as the current remote copy for `user_id`.
    fn push(&self, user_id: &str, document: &Document, timeout: Duration) -> SyncResult<()>;

    /// Fetches the current remote copy for `user_id`, if any.
    fn pull(&self, user_id: &str, timeout: Duration) -> SyncResult<Option<Document>>;

    /// Stores a named blob for `user_id` and returns its download URL.
    fn store_blob(
        &self,
        user_id: &str,
        name: &str,
        bytes: &[u8],
        timeout: Duration,
    ) -> SyncResult<String>;

    /// Deletes a named blob for `user_id`.
    fn delete_blob(&self, user_id: &str, name: &str, timeout: Duration) -> SyncResult<()>;

    /// Lists the blobs stored for `user_id`.
    fn list_blobs(&self, user_id: &str, timeout: Duration) -> SyncResult<Vec<BlobEntry>>;
}

/// A scriptable in-memory remote for testing.
///
/// Pushes and blobs land in memory; failures are injected deliberately
/// rather than simulated randomly, so tests stay deterministic.
#[derive(Debug, Default)]
pub struct MockRemote {
    documents: RwLock<BTreeMap<String, Document>>,
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
    push_count: RwLock<u64>,
    fail_pushes: RwLock<bool>,
    time_out_pushes: RwLock<bool>,
}

impl MockRemote {
    /// Creates a new mock remote that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent push fail with a network error.
    pub fn set_fail_pushes(&self, fail: bool) {
        *self.fail_pushes.write() = fail;
    }

    /// Makes every subsequent push fail with a timeout.
    pub fn set_time_out_pushes(&self, time_out: bool) {
        *self.time_out_pushes.write() = time_out;
    }

    /// Number of pushes that reached the mock, successful or not.
    #[must_use]
    pub fn push_count(&self) -> u64 {
        *self.push_count.read()
    }

    /// The document last pushed for `user_id`, if any.
    #[must_use]
    pub fn document(&self, user_id: &str) -> Option<Document> {
        self.documents.read().get(user_id).cloned()
    }

    /// Seeds a remote document, as if another device had pushed it.
    pub fn seed_document(&self, user_id: &str, document: Document) {
        self.documents.write().insert(user_id.to_string(), document);
    }

    fn blob_key(user_id: &str, name: &str) -> String {
        format!("{user_id}/{name}")
    }

    fn blob_url(user_id: &str, name: &str) -> String {
        format!("mock://blobs/{user_id}/{name}")
    }
}

impl RemoteService for MockRemote {
    fn push(&self, user_id: &str, document: &Document, _timeout: Duration) -> SyncResult<()> {
        *self.push_count.write() += 1;
        if *self.time_out_pushes.read() {
            return Err(SyncError::Timeout);
        }
        if *self.fail_pushes.read() {
            return Err(SyncError::network("mock push rejected"));
        }
        self.documents
            .write()
            .insert(user_id.to_string(), document.clone());
        Ok(())
    }

    fn pull(&self, user_id: &str, _timeout: Duration) -> SyncResult<Option<Document>> {
        Ok(self.documents.read().get(user_id).cloned())
    }

    fn store_blob(
        &self,
        user_id: &str,
        name: &str,
        bytes: &[u8],
        _timeout: Duration,
    ) -> SyncResult<String> {
        self.blobs
            .write()
            .insert(Self::blob_key(user_id, name), bytes.to_vec());
        Ok(Self::blob_url(user_id, name))
    }

    fn delete_blob(&self, user_id: &str, name: &str, _timeout: Duration) -> SyncResult<()> {
        if self
            .blobs
            .write()
            .remove(&Self::blob_key(user_id, name))
            .is_none()
        {
            return Err(SyncError::network(format!("no such blob: {name}")));
        }
        Ok(())
    }

    fn list_blobs(&self, user_id: &str, _timeout: Duration) -> SyncResult<Vec<BlobEntry>> {
        let prefix = format!("{user_id}/");
        Ok(self
            .blobs
            .read()
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(|name| BlobEntry {
                name: name.to_string(),
                url: Self::blob_url(user_id, name),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn mock_push_then_pull() {
        let remote = MockRemote::new();
        let mut doc = Document::new();
        doc.set_section("aboutMe", "Hi");

        remote.push("u1", &doc, TIMEOUT).unwrap();
        assert_eq!(remote.pull("u1", TIMEOUT).unwrap().unwrap(), doc);
        assert!(remote.pull("u2", TIMEOUT).unwrap().is_none());
        assert_eq!(remote.push_count(), 1);
    }

    #[test]
    fn mock_scripted_failures() {
        let remote = MockRemote::new();
        remote.set_fail_pushes(true);
        let err = remote.push("u1", &Document::new(), TIMEOUT).unwrap_err();
        assert!(matches!(err, SyncError::Network { .. }));

        remote.set_fail_pushes(false);
        remote.set_time_out_pushes(true);
        let err = remote.push("u1", &Document::new(), TIMEOUT).unwrap_err();
        assert!(matches!(err, SyncError::Timeout));
        assert_eq!(remote.push_count(), 2);
    }

    #[test]
    fn mock_blob_lifecycle() {
        let remote = MockRemote::new();
        let url = remote.store_blob("u1", "beach.jpg", b"jpeg", TIMEOUT).unwrap();
        assert_eq!(url, "mock://blobs/u1/beach.jpg");
        remote.store_blob("u1", "song.m4a", b"aac", TIMEOUT).unwrap();
        remote.store_blob("u2", "other.jpg", b"x", TIMEOUT).unwrap();

        let blobs = remote.list_blobs("u1", TIMEOUT).unwrap();
        let names: Vec<&str> = blobs.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["beach.jpg", "song.m4a"]);

        remote.delete_blob("u1", "beach.jpg", TIMEOUT).unwrap();
        assert_eq!(remote.list_blobs("u1", TIMEOUT).unwrap().len(), 1);
        assert!(remote.delete_blob("u1", "beach.jpg", TIMEOUT).is_err());
    }
}
