//! The single entry point an application embeds.

use crate::account::{AccountService, AuthChangeCallback, RemoteProfile};
use crate::directory::{Credentials, NewUser, UserDirectory, UserRecord, UserSummary};
use crate::error::{SessionError, SessionResult};
use crate::export::ExportBundle;
use chrono::{DateTime, Utc};
use memoir_core::{AudioRef, Document, DocumentPatch, PhotoRef, ProgressSummary, Snapshot};
use memoir_storage::StorageBackend;
use memoir_sync_engine::{
    BlobEntry, CloudSyncStatus, CommitOutcome, RemoteService, SaveStatus, SyncConfig, SyncEngine,
    SyncError, SyncResult,
};
use std::sync::Arc;
use std::time::Duration;

/// Placeholder remote for local-only sessions. Every call fails with
/// [`SyncError::RemoteDisabled`]; the engine is constructed without a
/// remote, so these paths are never reached in practice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRemote;

impl RemoteService for NoRemote {
    fn push(&self, _user_id: &str, _document: &Document, _timeout: Duration) -> SyncResult<()> {
        Err(SyncError::RemoteDisabled)
    }

    fn pull(&self, _user_id: &str, _timeout: Duration) -> SyncResult<Option<Document>> {
        Err(SyncError::RemoteDisabled)
    }

    fn store_blob(
        &self,
        _user_id: &str,
        _name: &str,
        _bytes: &[u8],
        _timeout: Duration,
    ) -> SyncResult<String> {
        Err(SyncError::RemoteDisabled)
    }

    fn delete_blob(&self, _user_id: &str, _name: &str, _timeout: Duration) -> SyncResult<()> {
        Err(SyncError::RemoteDisabled)
    }

    fn list_blobs(&self, _user_id: &str, _timeout: Duration) -> SyncResult<Vec<BlobEntry>> {
        Err(SyncError::RemoteDisabled)
    }
}

/// Placeholder account provider for local-only sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAccount;

impl AccountService for NoAccount {
    fn create_account(
        &self,
        _email: &str,
        _password: &str,
        _name: &str,
    ) -> SessionResult<RemoteProfile> {
        Err(SessionError::Unsupported {
            operation: "create_account",
        })
    }

    fn sign_in(&self, _email: &str, _password: &str) -> SessionResult<RemoteProfile> {
        Err(SessionError::Unsupported {
            operation: "sign_in",
        })
    }

    fn sign_out(&self) -> SessionResult<()> {
        Ok(())
    }

    fn on_auth_change(&self, _callback: AuthChangeCallback) {}
}

/// A local-only session over the default mocks.
pub type LocalSession = SessionFacade<NoRemote, NoAccount>;

/// The outward face of a Memoir session.
///
/// Hosts construct one facade per running app, wire their UI events to it,
/// and call [`SessionFacade::poll`] from their event loop so the debounce
/// timer makes progress.
pub struct SessionFacade<R: RemoteService, A: AccountService> {
    directory: UserDirectory<R, A>,
}

impl SessionFacade<NoRemote, NoAccount> {
    /// Creates a session with no remote and no identity provider. Users
    /// are plain directory records and documents live only in `backend`.
    #[must_use]
    pub fn local_only(config: SyncConfig, backend: Box<dyn StorageBackend>) -> Self {
        let engine = SyncEngine::new(config, backend, None);
        Self {
            directory: UserDirectory::new(engine, None),
        }
    }
}

impl<R: RemoteService, A: AccountService> SessionFacade<R, A> {
    /// Creates a session backed by a remote replica and identity provider.
    #[must_use]
    pub fn with_remote(
        config: SyncConfig,
        backend: Box<dyn StorageBackend>,
        remote: Arc<R>,
        account: Arc<A>,
    ) -> Self {
        let engine = SyncEngine::new(config, backend, Some(remote));
        Self {
            directory: UserDirectory::new(engine, Some(account)),
        }
    }

    /// The directory behind this facade, for operations with no shorthand
    /// here.
    #[must_use]
    pub fn directory(&self) -> &UserDirectory<R, A> {
        &self.directory
    }

    // Identity.

    /// Creates an account (or local record) and signs it in.
    ///
    /// # Errors
    ///
    /// Surfaces provider rejections ([`SessionError::Auth`]).
    pub fn sign_up(&self, new_user: NewUser) -> SessionResult<UserRecord> {
        self.directory.create_user(new_user)
    }

    /// Signs a user in and makes them active.
    ///
    /// # Errors
    ///
    /// Surfaces provider rejections ([`SessionError::Auth`]).
    pub fn sign_in(&self, credentials: Credentials) -> SessionResult<UserRecord> {
        self.directory.login(credentials)
    }

    /// Signs the active user out, flushing a pending save first.
    ///
    /// # Errors
    ///
    /// Surfaces provider sign-out failures.
    pub fn sign_out(&self) -> SessionResult<()> {
        self.directory.logout()
    }

    /// Activates another known user (local mode only).
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] under remote auth,
    /// [`SessionError::NotFound`] for an unknown id.
    pub fn switch_user(&self, user_id: &str) -> SessionResult<UserRecord> {
        self.directory.switch_user(user_id)
    }

    /// Deletes a user record, its document, and its version history.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] for an unknown id.
    pub fn delete_user(&self, user_id: &str) -> SessionResult<()> {
        self.directory.delete_user(user_id)
    }

    /// The active user's record, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserRecord> {
        self.directory.current_user()
    }

    /// Roster of all known users.
    #[must_use]
    pub fn users(&self) -> Vec<UserSummary> {
        self.directory.user_summaries()
    }

    // Document editing.

    /// Applies `patch` to the active user's document and schedules an
    /// auto-save. Silently ignored when no user is active.
    ///
    /// # Errors
    ///
    /// Never fails synchronously; save failures surface through
    /// [`SessionFacade::save_status`].
    pub fn update_document(&self, patch: DocumentPatch) -> SessionResult<Option<ProgressSummary>> {
        self.directory.update_document(patch)
    }

    /// The active user's current document.
    #[must_use]
    pub fn document(&self) -> Option<Document> {
        self.directory.get_document(None)
    }

    // Saving.

    /// Advances the debounce timer; call once per host event-loop tick.
    pub fn poll(&self) -> Option<CommitOutcome> {
        self.directory.poll()
    }

    /// Commits the active document now, bypassing the debounce timer.
    ///
    /// # Errors
    ///
    /// [`SessionError::Sync`] when no user is active or the commit fails.
    pub fn manual_save(&self) -> SessionResult<Option<CommitOutcome>> {
        self.directory.manual_save()
    }

    /// Local save state for the status indicator.
    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.directory.engine().save_status()
    }

    /// Replication state for the cloud indicator.
    #[must_use]
    pub fn cloud_sync_status(&self) -> CloudSyncStatus {
        self.directory.engine().cloud_sync_status()
    }

    /// Timestamp of the last successful local save in this session.
    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.directory.engine().last_saved()
    }

    // Versions.

    /// Retained snapshots for the active user, newest first.
    ///
    /// # Errors
    ///
    /// [`SessionError::Sync`] when no user is active or the read fails.
    pub fn versions(&self) -> SessionResult<Vec<Snapshot>> {
        Ok(self.directory.engine().versions()?)
    }

    /// Makes `snapshot` the active user's current document again.
    ///
    /// # Errors
    ///
    /// [`SessionError::Sync`] when no user is active or the write fails.
    pub fn restore_version(&self, snapshot: &Snapshot) -> SessionResult<Document> {
        self.directory.restore_version(snapshot)
    }

    // Media.

    /// Uploads a photo for the active user.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] without a remote.
    pub fn attach_photo(&self, name: &str, bytes: &[u8]) -> SessionResult<PhotoRef> {
        self.directory.attach_photo(name, bytes)
    }

    /// Uploads an audio recording for the active user.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] without a remote.
    pub fn attach_audio(
        &self,
        name: &str,
        bytes: &[u8],
        duration_secs: Option<f64>,
    ) -> SessionResult<AudioRef> {
        self.directory.attach_audio(name, bytes, duration_secs)
    }

    /// Deletes an uploaded photo.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] without a remote.
    pub fn detach_photo(&self, photo_id: &str) -> SessionResult<()> {
        self.directory.detach_photo(photo_id)
    }

    // Portability.

    /// Serializes the active user's full data graph for download.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] when no user is active.
    pub fn export_active_user(&self) -> SessionResult<ExportBundle> {
        let user = self.current_user().ok_or_else(|| SessionError::NotFound {
            user_id: "(no active user)".to_string(),
        })?;
        self.directory.export_user(&user.id)
    }

    /// Validates `bundle` and inserts a new, inactive user seeded from it.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidImport`] on malformed input.
    pub fn import_user(&self, bundle: &serde_json::Value) -> SessionResult<UserRecord> {
        self.directory.import_user(bundle)
    }
}
