//! The multi-user session directory.

use crate::account::{AccountService, RemoteProfile};
use crate::error::{AuthErrorReason, SessionError, SessionResult};
use crate::export::{ExportBundle, ExportedUser};
use chrono::{DateTime, Utc};
use memoir_core::{AudioRef, Document, DocumentPatch, PhotoRef, ProgressSummary, Snapshot};
use memoir_sync_engine::{CommitOutcome, RemoteService, SyncEngine};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Legacy default for sign-up forms that collect no password.
const DEFAULT_PASSWORD: &str = "123456";

/// Profile data for a new local or remote user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Password, required for remote sign-up.
    pub password: Option<String>,
    /// Avatar URL; generated from the name when absent.
    pub avatar_url: Option<String>,
}

/// Credentials presented at login.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Password, required in remote mode.
    pub password: Option<String>,
    /// Display name used if a local record has to be created.
    pub name: Option<String>,
}

/// One user known to the directory.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stable id (directory-assigned locally, provider-assigned remotely).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When this user last became active.
    pub last_login_at: DateTime<Utc>,
    /// The user's biography content graph.
    pub document: Document,
    /// Derived progress metrics, recomputed on every document update.
    pub progress: ProgressSummary,
}

/// The roster view of a record, without the document payload.
#[derive(Debug, Clone)]
pub struct UserSummary {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When this user last became active.
    pub last_login_at: DateTime<Utc>,
    /// Derived progress metrics.
    pub progress: ProgressSummary,
}

#[derive(Default)]
struct DirectoryState {
    active_user_id: Option<String>,
    records: BTreeMap<String, UserRecord>,
}

/// Owns the set of known user records and which one is active.
///
/// The directory never writes document data itself: every document change
/// routes through [`SyncEngine::schedule`] so versioning invariants hold.
///
/// With an [`AccountService`] attached the directory runs in remote-auth
/// mode: identities come from the provider, and [`UserDirectory::switch_user`]
/// is refused because the provider requires re-authentication per user.
pub struct UserDirectory<R: RemoteService, A: AccountService> {
    engine: SyncEngine<R>,
    account: Option<Arc<A>>,
    state: RwLock<DirectoryState>,
}

/// Storage key for a user's document.
fn storage_key(user_id: &str) -> String {
    format!("user::{user_id}")
}

/// Generated avatar for users without one, in the style the original
/// account provider used.
fn generated_avatar_url(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    format!("https://ui-avatars.com/api/?name={encoded}&background=3b82f6&color=fff")
}

impl<R: RemoteService, A: AccountService> UserDirectory<R, A> {
    /// Creates a directory over `engine`, in remote-auth mode when
    /// `account` is given.
    pub fn new(engine: SyncEngine<R>, account: Option<Arc<A>>) -> Self {
        Self {
            engine,
            account,
            state: RwLock::new(DirectoryState::default()),
        }
    }

    /// Returns true if an identity provider is attached.
    #[must_use]
    pub fn is_remote_auth(&self) -> bool {
        self.account.is_some()
    }

    /// The save engine this directory routes document writes through.
    #[must_use]
    pub fn engine(&self) -> &SyncEngine<R> {
        &self.engine
    }

    /// The active user's record, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserRecord> {
        let state = self.state.read();
        let id = state.active_user_id.as_ref()?;
        state.records.get(id).cloned()
    }

    /// Roster of all known users, without document payloads.
    #[must_use]
    pub fn user_summaries(&self) -> Vec<UserSummary> {
        self.state
            .read()
            .records
            .values()
            .map(|r| UserSummary {
                id: r.id.clone(),
                name: r.name.clone(),
                email: r.email.clone(),
                avatar_url: r.avatar_url.clone(),
                created_at: r.created_at,
                last_login_at: r.last_login_at,
                progress: r.progress.clone(),
            })
            .collect()
    }

    /// The biography document for `user_id`, or the active user when
    /// `None`. Absence is not an error: returns `None` when there is no
    /// such user (or no active one).
    #[must_use]
    pub fn get_document(&self, user_id: Option<&str>) -> Option<Document> {
        let state = self.state.read();
        let id = match user_id {
            Some(id) => id,
            None => state.active_user_id.as_deref()?,
        };
        state.records.get(id).map(|r| r.document.clone())
    }

    /// Creates a new user record and makes it active.
    ///
    /// In remote-auth mode the account is created with the provider first;
    /// locally a fresh id is assigned. Either way the record starts with
    /// the standard empty biography sections.
    ///
    /// # Errors
    ///
    /// Surfaces provider rejections ([`SessionError::Auth`]).
    pub fn create_user(&self, new_user: NewUser) -> SessionResult<UserRecord> {
        let record = match &self.account {
            Some(account) => {
                let password = new_user.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
                let profile =
                    account.create_account(&new_user.email, password, &new_user.name)?;
                self.record_from_profile(profile)
            }
            None => {
                let now = Utc::now();
                let name = new_user.name;
                UserRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    avatar_url: new_user
                        .avatar_url
                        .unwrap_or_else(|| generated_avatar_url(&name)),
                    email: new_user.email,
                    created_at: now,
                    last_login_at: now,
                    document: Document::with_standard_sections(),
                    progress: ProgressSummary::default(),
                    name,
                }
            }
        };

        info!(user_id = %record.id, "created user");
        self.insert_and_activate(record.clone());
        Ok(record)
    }

    /// Logs a user in and makes them active.
    ///
    /// Local mode: an existing record matching the email is reused (its
    /// `last_login_at` is bumped); otherwise a record is created on the
    /// spot. Remote mode: the provider authenticates and the record is
    /// hydrated from the returned profile and the replicated document.
    ///
    /// # Errors
    ///
    /// Surfaces provider rejections ([`SessionError::Auth`]).
    pub fn login(&self, credentials: Credentials) -> SessionResult<UserRecord> {
        match &self.account {
            Some(account) => {
                let password = credentials.password.as_deref().ok_or_else(|| {
                    SessionError::auth(AuthErrorReason::BadCredentials, "password required")
                })?;
                let profile = account.sign_in(&credentials.email, password)?;
                let had_document = profile.document.is_some();
                let mut record = self.record_from_profile(profile);
                info!(user_id = %record.id, "signed in");
                self.insert_and_activate(record.clone());

                // Profile carried no document: recover from the local store,
                // then from the replica, before settling for empty sections.
                if !had_document {
                    let recovered = self
                        .engine
                        .read_current()
                        .ok()
                        .flatten()
                        .or_else(|| self.engine.pull_remote().ok().flatten());
                    if let Some(document) = recovered {
                        record.progress = ProgressSummary::of(&document, None);
                        record.document = document;
                        let mut state = self.state.write();
                        state.records.insert(record.id.clone(), record.clone());
                    }
                }
                Ok(record)
            }
            None => {
                let existing = {
                    let state = self.state.read();
                    state
                        .records
                        .values()
                        .find(|r| r.email == credentials.email)
                        .map(|r| r.id.clone())
                };
                match existing {
                    Some(id) => self.activate_existing(&id),
                    None => {
                        let name = credentials
                            .name
                            .unwrap_or_else(|| local_part(&credentials.email));
                        self.create_user(NewUser {
                            name,
                            email: credentials.email,
                            ..NewUser::default()
                        })
                    }
                }
            }
        }
    }

    /// Clears the active user. No record is deleted; a pending save is
    /// flushed on the way out.
    ///
    /// # Errors
    ///
    /// Surfaces provider sign-out failures in remote mode.
    pub fn logout(&self) -> SessionResult<()> {
        self.engine.deactivate();
        self.state.write().active_user_id = None;
        if let Some(account) = &self.account {
            account.sign_out()?;
        }
        debug!("logged out");
        Ok(())
    }

    /// Activates another known user.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] in remote-auth mode (the provider
    /// requires re-authentication per user); [`SessionError::NotFound`]
    /// when `user_id` is unknown.
    pub fn switch_user(&self, user_id: &str) -> SessionResult<UserRecord> {
        if self.is_remote_auth() {
            return Err(SessionError::Unsupported {
                operation: "switch_user",
            });
        }
        if !self.state.read().records.contains_key(user_id) {
            return Err(SessionError::NotFound {
                user_id: user_id.to_string(),
            });
        }
        self.activate_existing(user_id)
    }

    /// Deletes a user record along with its stored document and version
    /// history. Deleting the active user clears the active id.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] when `user_id` is unknown; store
    /// failures while purging.
    pub fn delete_user(&self, user_id: &str) -> SessionResult<()> {
        {
            let mut state = self.state.write();
            if state.records.remove(user_id).is_none() {
                return Err(SessionError::NotFound {
                    user_id: user_id.to_string(),
                });
            }
            if state.active_user_id.as_deref() == Some(user_id) {
                state.active_user_id = None;
            }
        }
        self.engine.purge(&storage_key(user_id))?;
        info!(user_id, "deleted user");
        Ok(())
    }

    /// Merges `patch` into the active user's document (shallow top-level
    /// replace), recomputes the progress summary, and forwards the merged
    /// document to the save engine.
    ///
    /// Returns `Ok(None)` as a deliberate no-op when no user is active:
    /// the UI may fire updates during transition animations.
    ///
    /// # Errors
    ///
    /// This path never fails synchronously; save failures surface through
    /// the engine's status signals.
    pub fn update_document(&self, patch: DocumentPatch) -> SessionResult<Option<ProgressSummary>> {
        let mut state = self.state.write();
        let Some(id) = state.active_user_id.clone() else {
            debug!("update_document with no active user; ignoring");
            return Ok(None);
        };
        let Some(record) = state.records.get_mut(&id) else {
            return Ok(None);
        };

        record.document.apply(patch);
        record.progress = ProgressSummary::of(&record.document, self.engine.last_saved());
        let progress = record.progress.clone();
        self.engine.schedule(record.document.clone());
        Ok(Some(progress))
    }

    /// Drives the engine's debounce timer and keeps the active record's
    /// cached progress in step with completed commits.
    pub fn poll(&self) -> Option<CommitOutcome> {
        let outcome = self.engine.poll()?;
        self.note_saved(outcome.snapshot.timestamp);
        Some(outcome)
    }

    /// Commits the active user's document immediately, bypassing the
    /// debounce timer.
    ///
    /// # Errors
    ///
    /// [`SessionError::Sync`] when no user is active or the local commit
    /// fails.
    pub fn manual_save(&self) -> SessionResult<Option<CommitOutcome>> {
        let outcome = self.engine.manual_save()?;
        if let Some(outcome) = &outcome {
            self.note_saved(outcome.snapshot.timestamp);
        }
        Ok(outcome)
    }

    /// Makes `snapshot` the active user's current document again.
    ///
    /// # Errors
    ///
    /// [`SessionError::Sync`] when no user is active or the store write
    /// fails.
    pub fn restore_version(&self, snapshot: &Snapshot) -> SessionResult<Document> {
        let document = self.engine.restore_version(snapshot)?;
        let mut state = self.state.write();
        if let Some(id) = state.active_user_id.clone() {
            if let Some(record) = state.records.get_mut(&id) {
                record.document = document.clone();
                record.progress = ProgressSummary::of(&document, Some(snapshot.timestamp));
            }
        }
        Ok(document)
    }

    /// Uploads a photo blob for the active user and records the reference
    /// in their document.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] without a remote;
    /// [`SessionError::Sync`] when no user is active or the upload fails.
    pub fn attach_photo(&self, name: &str, bytes: &[u8]) -> SessionResult<PhotoRef> {
        let user_id = self.require_active_for_blobs("attach_photo")?;
        let url = self.engine.store_blob(&user_id, name, bytes)?;
        let photo = PhotoRef {
            id: name.to_string(),
            name: name.to_string(),
            url,
            uploaded_at: Utc::now(),
        };
        self.append_to_active_document(|document| document.add_photo(photo.clone()));
        Ok(photo)
    }

    /// Uploads an audio blob for the active user and records the reference
    /// in their document.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] without a remote;
    /// [`SessionError::Sync`] when no user is active or the upload fails.
    pub fn attach_audio(
        &self,
        name: &str,
        bytes: &[u8],
        duration_secs: Option<f64>,
    ) -> SessionResult<AudioRef> {
        let user_id = self.require_active_for_blobs("attach_audio")?;
        let url = self.engine.store_blob(&user_id, name, bytes)?;
        let audio = AudioRef {
            id: name.to_string(),
            name: name.to_string(),
            url,
            duration_secs,
            uploaded_at: Utc::now(),
        };
        self.append_to_active_document(|document| document.add_audio(audio.clone()));
        Ok(audio)
    }

    /// Deletes a photo blob and drops its reference from the active
    /// user's document.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unsupported`] without a remote;
    /// [`SessionError::Sync`] when no user is active or the delete fails.
    pub fn detach_photo(&self, photo_id: &str) -> SessionResult<()> {
        let user_id = self.require_active_for_blobs("detach_photo")?;
        self.engine.delete_blob(&user_id, photo_id)?;
        self.append_to_active_document(|document| {
            document.photos.retain(|p| p.id != photo_id);
        });
        Ok(())
    }

    /// Serializes a user's full data graph for download. Pure: no state
    /// changes.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] when `user_id` is unknown.
    pub fn export_user(&self, user_id: &str) -> SessionResult<ExportBundle> {
        let state = self.state.read();
        let record = state.records.get(user_id).ok_or_else(|| SessionError::NotFound {
            user_id: user_id.to_string(),
        })?;

        Ok(ExportBundle {
            user: ExportedUser {
                name: record.name.clone(),
                email: record.email.clone(),
                created_at: record.created_at,
            },
            biography: record.document.clone(),
            exported_at: Utc::now(),
        })
    }

    /// Validates `bundle` and inserts a new record seeded from it, under a
    /// fresh id. The imported user is not activated.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidImport`] on malformed input; nothing is
    /// inserted in that case.
    pub fn import_user(&self, bundle: &serde_json::Value) -> SessionResult<UserRecord> {
        let bundle = ExportBundle::from_value(bundle)?;

        let now = Utc::now();
        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            avatar_url: generated_avatar_url(&bundle.user.name),
            name: bundle.user.name,
            email: bundle.user.email,
            created_at: bundle.user.created_at,
            last_login_at: now,
            progress: ProgressSummary::of(&bundle.biography, None),
            document: bundle.biography,
        };

        self.state
            .write()
            .records
            .insert(record.id.clone(), record.clone());
        info!(user_id = %record.id, "imported user");
        Ok(record)
    }

    fn record_from_profile(&self, profile: RemoteProfile) -> UserRecord {
        let document = profile
            .document
            .unwrap_or_else(Document::with_standard_sections);
        UserRecord {
            avatar_url: profile
                .avatar_url
                .unwrap_or_else(|| generated_avatar_url(&profile.name)),
            id: profile.id,
            name: profile.name,
            email: profile.email,
            created_at: profile.created_at,
            last_login_at: Utc::now(),
            progress: ProgressSummary::of(&document, None),
            document,
        }
    }

    fn insert_and_activate(&self, record: UserRecord) {
        let id = record.id.clone();
        {
            let mut state = self.state.write();
            state.records.insert(id.clone(), record);
            state.active_user_id = Some(id.clone());
        }
        self.engine.activate(storage_key(&id), id);
    }

    fn activate_existing(&self, user_id: &str) -> SessionResult<UserRecord> {
        let record = {
            let mut state = self.state.write();
            let record = state.records.get_mut(user_id).ok_or_else(|| {
                SessionError::NotFound {
                    user_id: user_id.to_string(),
                }
            })?;
            record.last_login_at = Utc::now();
            let record = record.clone();
            state.active_user_id = Some(record.id.clone());
            record
        };
        self.engine
            .activate(storage_key(&record.id), record.id.clone());
        Ok(record)
    }

    fn require_active_for_blobs(&self, operation: &'static str) -> SessionResult<String> {
        if !self.engine.has_remote() {
            return Err(SessionError::Unsupported { operation });
        }
        self.state
            .read()
            .active_user_id
            .clone()
            .ok_or(SessionError::Sync(memoir_sync_engine::SyncError::NoActiveKey))
    }

    /// Mutates the active document in place and re-schedules it.
    fn append_to_active_document(&self, mutate: impl FnOnce(&mut Document)) {
        let mut state = self.state.write();
        let Some(id) = state.active_user_id.clone() else {
            return;
        };
        if let Some(record) = state.records.get_mut(&id) {
            mutate(&mut record.document);
            record.progress = ProgressSummary::of(&record.document, self.engine.last_saved());
            self.engine.schedule(record.document.clone());
        }
    }

    fn note_saved(&self, timestamp: DateTime<Utc>) {
        let mut state = self.state.write();
        if let Some(id) = state.active_user_id.clone() {
            if let Some(record) = state.records.get_mut(&id) {
                record.progress.last_saved = Some(timestamp);
            }
        }
    }
}

fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MockAccount;
    use memoir_storage::InMemoryBackend;
    use memoir_sync_engine::{MockRemote, SyncConfig};

    fn local_directory() -> UserDirectory<MockRemote, MockAccount> {
        let engine = SyncEngine::new(SyncConfig::new(), Box::new(InMemoryBackend::new()), None);
        UserDirectory::new(engine, None)
    }

    fn ada() -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            ..NewUser::default()
        }
    }

    #[test]
    fn create_user_activates_and_seeds_sections() {
        let directory = local_directory();
        let record = directory.create_user(ada()).unwrap();

        assert_eq!(directory.current_user().unwrap().id, record.id);
        assert_eq!(record.document.sections.len(), 6);
        assert_eq!(directory.engine().active_key().unwrap(), storage_key(&record.id));
    }

    #[test]
    fn local_login_reuses_record_by_email() {
        let directory = local_directory();
        let first = directory.create_user(ada()).unwrap();
        directory.logout().unwrap();

        let again = directory
            .login(Credentials {
                email: "ada@x.io".into(),
                ..Credentials::default()
            })
            .unwrap();
        assert_eq!(again.id, first.id);
        assert!(again.last_login_at >= first.last_login_at);
        assert_eq!(directory.user_summaries().len(), 1);
    }

    #[test]
    fn local_login_creates_unknown_user() {
        let directory = local_directory();
        let record = directory
            .login(Credentials {
                email: "bo@x.io".into(),
                name: Some("Bo".into()),
                ..Credentials::default()
            })
            .unwrap();
        assert_eq!(record.name, "Bo");
        assert_eq!(directory.user_summaries().len(), 1);
    }

    #[test]
    fn logout_keeps_records() {
        let directory = local_directory();
        directory.create_user(ada()).unwrap();
        directory.logout().unwrap();
        assert!(directory.current_user().is_none());
        assert_eq!(directory.user_summaries().len(), 1);
    }

    #[test]
    fn switch_user_local_mode() {
        let directory = local_directory();
        let first = directory.create_user(ada()).unwrap();
        directory
            .create_user(NewUser {
                name: "Bo".into(),
                email: "bo@x.io".into(),
                ..NewUser::default()
            })
            .unwrap();

        let switched = directory.switch_user(&first.id).unwrap();
        assert_eq!(switched.id, first.id);
        assert_eq!(directory.current_user().unwrap().id, first.id);

        assert!(matches!(
            directory.switch_user("nope"),
            Err(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn switch_user_is_unsupported_under_remote_auth() {
        let account = Arc::new(MockAccount::new());
        let remote = Arc::new(MockRemote::new());
        let engine = SyncEngine::new(
            SyncConfig::new(),
            Box::new(InMemoryBackend::new()),
            Some(remote),
        );
        let directory = UserDirectory::new(engine, Some(account));

        let record = directory
            .create_user(NewUser {
                name: "Ada".into(),
                email: "ada@x.io".into(),
                password: Some("hunter2!".into()),
                ..NewUser::default()
            })
            .unwrap();

        assert!(matches!(
            directory.switch_user(&record.id),
            Err(SessionError::Unsupported {
                operation: "switch_user"
            })
        ));
        // Nothing changed.
        assert_eq!(directory.current_user().unwrap().id, record.id);
    }

    #[test]
    fn delete_active_user_clears_active_id() {
        let directory = local_directory();
        let record = directory.create_user(ada()).unwrap();

        directory.delete_user(&record.id).unwrap();
        assert!(directory.current_user().is_none());
        assert!(directory.get_document(None).is_none());
        assert!(directory.user_summaries().is_empty());
        assert!(matches!(
            directory.delete_user(&record.id),
            Err(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn update_document_merges_and_schedules() {
        let directory = local_directory();
        let record = directory.create_user(ada()).unwrap();

        let patch = DocumentPatch::section(&record.document, "aboutMe", "Hi, I am Ada.");
        let progress = directory.update_document(patch).unwrap().unwrap();
        assert_eq!(progress.total_words, 4);

        // The engine received the merged document.
        let outcome = directory.engine().manual_save().unwrap().unwrap();
        assert_eq!(outcome.snapshot.data.sections["aboutMe"], "Hi, I am Ada.");
    }

    #[test]
    fn update_document_without_active_user_is_silent_noop() {
        let directory = local_directory();
        let result = directory.update_document(DocumentPatch::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn export_then_import_roundtrip_under_new_id() {
        let directory = local_directory();
        let record = directory.create_user(ada()).unwrap();
        directory
            .update_document(DocumentPatch::section(&record.document, "aboutMe", "Hi"))
            .unwrap();

        let bundle = directory.export_user(&record.id).unwrap();
        let value = serde_json::to_value(&bundle).unwrap();

        let imported = directory.import_user(&value).unwrap();
        assert_ne!(imported.id, record.id);
        assert_eq!(imported.name, "Ada");
        assert_eq!(imported.document.sections["aboutMe"], "Hi");
        assert_eq!(directory.user_summaries().len(), 2);
        // Import does not steal the active slot.
        assert_eq!(directory.current_user().unwrap().id, record.id);
    }

    #[test]
    fn malformed_import_inserts_nothing() {
        let directory = local_directory();
        directory.create_user(ada()).unwrap();

        let value = serde_json::json!({
            "user": { "name": "Bo" },
            "biography": {}
        });
        assert!(matches!(
            directory.import_user(&value),
            Err(SessionError::InvalidImport { .. })
        ));
        assert_eq!(directory.user_summaries().len(), 1);
    }

    #[test]
    fn blob_attach_requires_a_remote() {
        let directory = local_directory();
        directory.create_user(ada()).unwrap();
        assert!(matches!(
            directory.attach_photo("beach.jpg", b"jpeg"),
            Err(SessionError::Unsupported { .. })
        ));
    }

    #[test]
    fn avatar_url_encodes_names() {
        let url = generated_avatar_url("Ada Lovelace");
        assert!(url.contains("name=Ada+Lovelace"));
        let url = generated_avatar_url("Bo & Co");
        assert!(url.contains("name=Bo+%26+Co"));
    }
}
