//! The debounced save engine.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteService;
use crate::status::{CloudSyncStatus, SaveStatus};
use chrono::{DateTime, Utc};
use memoir_core::{CoreResult, Document, Snapshot, VersionedLocalStore};
use memoir_storage::StorageBackend;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// The result of one fired commit.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// The snapshot the local store produced.
    pub snapshot: Snapshot,
    /// `Some(true)` if the follow-up push succeeded, `Some(false)` if it
    /// failed, `None` if replication was disabled or no remote is attached.
    pub pushed: Option<bool>,
}

/// The key and remote identity the engine currently writes for.
#[derive(Debug, Clone)]
struct Target {
    key: String,
    user_id: String,
}

/// A document waiting out its debounce window.
#[derive(Debug)]
struct Pending {
    document: Document,
    deadline: Instant,
}

#[derive(Default)]
struct EngineState {
    target: Option<Target>,
    pending: Option<Pending>,
    /// Last scheduled-or-committed document; what `manual_save` re-commits
    /// when nothing is pending.
    latest: Option<Document>,
    save_status: SaveStatus,
    cloud_status: CloudSyncStatus,
    last_saved: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Debounced auto-save into a [`VersionedLocalStore`] with best-effort
/// replication to a [`RemoteService`].
///
/// The engine is the single writer for document data: everything above it
/// (the user directory, the session facade) routes writes through
/// [`SyncEngine::schedule`] so versioning invariants hold.
///
/// It is caller-driven in a cooperative single-threaded model: the host
/// event loop calls [`SyncEngine::poll`] each tick; nothing blocks and no
/// background threads are spawned. Tests drive [`SyncEngine::poll_at`] and
/// [`SyncEngine::schedule_at`] with explicit instants.
pub struct SyncEngine<R: RemoteService> {
    config: SyncConfig,
    store: VersionedLocalStore,
    remote: Option<Arc<R>>,
    state: Mutex<EngineState>,
}

impl<R: RemoteService> SyncEngine<R> {
    /// Creates an engine over `backend`, replicating to `remote` when given.
    pub fn new(config: SyncConfig, backend: Box<dyn StorageBackend>, remote: Option<Arc<R>>) -> Self {
        let store = VersionedLocalStore::with_history_limit(backend, config.history_limit);
        Self {
            config,
            store,
            remote,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns true if a remote service is attached.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The storage key currently being written, if any.
    #[must_use]
    pub fn active_key(&self) -> Option<String> {
        self.state.lock().target.as_ref().map(|t| t.key.clone())
    }

    /// Retargets the engine at `key` (with `user_id` as the remote
    /// identity), flushing any pending commit for the previous key first so
    /// an edit made just before a switch is not dropped.
    ///
    /// Both status signals reset for the new target.
    pub fn activate(&self, key: impl Into<String>, user_id: impl Into<String>) {
        let mut state = self.state.lock();
        self.flush_pending(&mut state);

        state.target = Some(Target {
            key: key.into(),
            user_id: user_id.into(),
        });
        state.pending = None;
        state.latest = None;
        state.save_status = SaveStatus::Idle;
        state.cloud_status = CloudSyncStatus::Synced;
        state.last_saved = None;
        state.last_error = None;
    }

    /// Clears the active target, flushing any pending commit first.
    pub fn deactivate(&self) {
        let mut state = self.state.lock();
        self.flush_pending(&mut state);
        state.target = None;
        state.pending = None;
        state.latest = None;
    }

    /// Records `document` as the pending save and restarts the debounce
    /// window (trailing debounce: each call supersedes the previous pending
    /// document, which is discarded without ever being committed).
    ///
    /// Scheduling an unchanged document is a valid no-op trigger; the
    /// engine does not diff. With no active target the call is ignored.
    pub fn schedule(&self, document: Document) {
        self.schedule_at(document, Instant::now());
    }

    /// [`SyncEngine::schedule`] with an explicit current instant.
    pub fn schedule_at(&self, document: Document, now: Instant) {
        let mut state = self.state.lock();
        if state.target.is_none() {
            warn!("schedule with no active target; dropping document");
            return;
        }
        state.latest = Some(document.clone());
        state.pending = Some(Pending {
            document,
            deadline: now + self.config.debounce_delay,
        });
    }

    /// Fires the pending commit if its debounce window has elapsed.
    ///
    /// The host event loop calls this each tick. Local-commit failures are
    /// captured in [`SaveStatus::Error`] and `last_error`, never raised
    /// across the debounce boundary.
    pub fn poll(&self) -> Option<CommitOutcome> {
        self.poll_at(Instant::now())
    }

    /// [`SyncEngine::poll`] with an explicit current instant.
    pub fn poll_at(&self, now: Instant) -> Option<CommitOutcome> {
        let mut state = self.state.lock();
        let due = matches!(&state.pending, Some(p) if now >= p.deadline);
        if !due {
            return None;
        }
        match self.commit_now(&mut state) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "debounced commit failed");
                None
            }
        }
    }

    /// Commits immediately, bypassing the debounce timer, and pushes if
    /// replication is enabled.
    ///
    /// Returns `Ok(None)` when there is nothing to save (no document was
    /// ever scheduled for the active target).
    ///
    /// # Errors
    ///
    /// Returns the local-commit failure; `SaveStatus` is set to `Error` as
    /// well so the UI indicator and the caller agree.
    pub fn manual_save(&self) -> SyncResult<Option<CommitOutcome>> {
        let mut state = self.state.lock();
        if state.target.is_none() {
            return Err(SyncError::NoActiveKey);
        }
        self.commit_now(&mut state)
    }

    /// The version history for the active key, most-recent-first.
    ///
    /// # Errors
    ///
    /// Fails when no target is active or the store cannot be read.
    pub fn versions(&self) -> SyncResult<Vec<Snapshot>> {
        let key = self.active_key().ok_or(SyncError::NoActiveKey)?;
        Ok(self.store.history(&key)?)
    }

    /// Makes `snapshot` the current value for the active key and updates
    /// `last_saved` to the snapshot's timestamp. History is unchanged.
    ///
    /// # Errors
    ///
    /// Fails when no target is active or the store write fails.
    pub fn restore_version(&self, snapshot: &Snapshot) -> SyncResult<Document> {
        let mut state = self.state.lock();
        let target = state.target.clone().ok_or(SyncError::NoActiveKey)?;

        let document = self.store.restore(&target.key, snapshot)?;
        state.pending = None;
        state.latest = Some(document.clone());
        state.last_saved = Some(snapshot.timestamp);
        state.save_status = SaveStatus::Saved;
        Ok(document)
    }

    /// Reads the current committed document for the active key.
    ///
    /// # Errors
    ///
    /// Fails when no target is active or the store cannot be read.
    pub fn read_current(&self) -> SyncResult<Option<Document>> {
        let key = self.active_key().ok_or(SyncError::NoActiveKey)?;
        Ok(self.store.read(&key)?)
    }

    /// Fetches the remote copy of the active user's document.
    ///
    /// A failure flips [`CloudSyncStatus`] to error and is returned to the
    /// caller; the local store is untouched.
    ///
    /// # Errors
    ///
    /// Fails when no target is active, no remote is attached, or the remote
    /// call fails or times out.
    pub fn pull_remote(&self) -> SyncResult<Option<Document>> {
        let target = {
            let state = self.state.lock();
            state.target.clone().ok_or(SyncError::NoActiveKey)?
        };
        let remote = self.remote.as_ref().ok_or(SyncError::RemoteDisabled)?;

        match remote.pull(&target.user_id, self.config.remote_timeout) {
            Ok(document) => Ok(document),
            Err(e) => {
                self.state.lock().cloud_status = CloudSyncStatus::Error;
                Err(e)
            }
        }
    }

    /// Removes the current value and history for `key` from the local
    /// store, clearing the target if it pointed there.
    ///
    /// # Errors
    ///
    /// Surfaces store failures.
    pub fn purge(&self, key: &str) -> CoreResult<()> {
        let mut state = self.state.lock();
        if state.target.as_ref().is_some_and(|t| t.key == key) {
            state.target = None;
            state.pending = None;
            state.latest = None;
        }
        self.store.purge(key)
    }

    /// Blob operations on the attached remote, with the configured timeout
    /// applied.
    ///
    /// # Errors
    ///
    /// Fails when no remote is attached or the remote call fails.
    pub fn store_blob(&self, user_id: &str, name: &str, bytes: &[u8]) -> SyncResult<String> {
        let remote = self.remote.as_ref().ok_or(SyncError::RemoteDisabled)?;
        remote.store_blob(user_id, name, bytes, self.config.remote_timeout)
    }

    /// Deletes a blob on the attached remote.
    ///
    /// # Errors
    ///
    /// Fails when no remote is attached or the remote call fails.
    pub fn delete_blob(&self, user_id: &str, name: &str) -> SyncResult<()> {
        let remote = self.remote.as_ref().ok_or(SyncError::RemoteDisabled)?;
        remote.delete_blob(user_id, name, self.config.remote_timeout)
    }

    /// Lists blobs on the attached remote.
    ///
    /// # Errors
    ///
    /// Fails when no remote is attached or the remote call fails.
    pub fn list_blobs(&self, user_id: &str) -> SyncResult<Vec<crate::BlobEntry>> {
        let remote = self.remote.as_ref().ok_or(SyncError::RemoteDisabled)?;
        remote.list_blobs(user_id, self.config.remote_timeout)
    }

    /// The state of the local-commit path.
    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.state.lock().save_status
    }

    /// The state of the replication path.
    #[must_use]
    pub fn cloud_sync_status(&self) -> CloudSyncStatus {
        self.state.lock().cloud_status
    }

    /// Timestamp of the last successful local commit or restore.
    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_saved
    }

    /// Human-readable description of the last local-commit failure.
    ///
    /// Cleared by the next successful commit.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    /// Commits the pending-or-latest document for the active target.
    ///
    /// Local commit first; only on success is a push attempted, and a push
    /// failure only ever touches the cloud status.
    fn commit_now(&self, state: &mut EngineState) -> SyncResult<Option<CommitOutcome>> {
        let Some(target) = state.target.clone() else {
            return Err(SyncError::NoActiveKey);
        };
        let document = match state.pending.take() {
            Some(pending) => pending.document,
            None => match state.latest.clone() {
                Some(document) => document,
                None => return Ok(None),
            },
        };

        state.save_status = SaveStatus::Saving;
        let snapshot = match self.store.commit(&target.key, &document) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(key = %target.key, error = %e, "local commit failed");
                state.save_status = SaveStatus::Error;
                state.last_error = Some(e.to_string());
                // Keep the document so a retry (manual or re-scheduled) can
                // still save it.
                state.latest = Some(document);
                return Err(e.into());
            }
        };

        state.save_status = SaveStatus::Saved;
        state.last_saved = Some(snapshot.timestamp);
        state.last_error = None;
        state.latest = Some(document.clone());

        let pushed = match (&self.remote, self.config.cloud_backup_enabled) {
            (Some(remote), true) => {
                state.cloud_status = CloudSyncStatus::Syncing;
                match remote.push(&target.user_id, &document, self.config.remote_timeout) {
                    Ok(()) => {
                        state.cloud_status = CloudSyncStatus::Synced;
                        Some(true)
                    }
                    Err(e) => {
                        // Best-effort replication: the local save stands.
                        warn!(user_id = %target.user_id, error = %e, "remote push failed");
                        state.cloud_status = CloudSyncStatus::Error;
                        Some(false)
                    }
                }
            }
            _ => None,
        };

        debug!(key = %target.key, version = snapshot.version, ?pushed, "save complete");
        Ok(Some(CommitOutcome { snapshot, pushed }))
    }

    /// Commits a pending document immediately, recording but not
    /// propagating failures. Used when retargeting.
    fn flush_pending(&self, state: &mut EngineState) {
        if state.pending.is_some() {
            if let Err(e) = self.commit_now(state) {
                warn!(error = %e, "flush of pending commit failed");
            }
        }
    }
}
