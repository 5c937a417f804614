//! Integration tests for full session lifecycles.

use memoir_core::DocumentPatch;
use memoir_session::{
    Credentials, MockAccount, NewUser, SessionFacade,
};
use memoir_storage::{FileBackend, InMemoryBackend};
use memoir_sync_engine::{CloudSyncStatus, MockRemote, SaveStatus, SyncConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Zero debounce so `poll` commits on the next tick without sleeping.
fn instant_config() -> SyncConfig {
    SyncConfig::new().with_debounce_delay(Duration::ZERO)
}

fn remote_session(
    remote: &Arc<MockRemote>,
    account: &Arc<MockAccount>,
) -> SessionFacade<MockRemote, MockAccount> {
    SessionFacade::with_remote(
        instant_config(),
        Box::new(InMemoryBackend::new()),
        Arc::clone(remote),
        Arc::clone(account),
    )
}

#[test]
fn remote_lifecycle_edit_commit_push() {
    let remote = Arc::new(MockRemote::new());
    let account = Arc::new(MockAccount::new());
    let session = remote_session(&remote, &account);

    let ada = session
        .sign_up(NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            password: Some("hunter2!".into()),
            ..NewUser::default()
        })
        .unwrap();

    session
        .update_document(DocumentPatch::section(&ada.document, "aboutMe", "Born in London."))
        .unwrap();
    let outcome = session.poll().expect("zero debounce commits on first poll");

    assert_eq!(outcome.pushed, Some(true));
    assert_eq!(session.save_status(), SaveStatus::Saved);
    assert_eq!(session.cloud_sync_status(), CloudSyncStatus::Synced);
    assert_eq!(
        remote.document(&ada.id).unwrap().sections["aboutMe"],
        "Born in London."
    );
}

#[test]
fn sign_in_on_a_new_device_pulls_the_replica() {
    let remote = Arc::new(MockRemote::new());
    let account = Arc::new(MockAccount::new());

    // First device: sign up, write, push.
    {
        let session = remote_session(&remote, &account);
        let ada = session
            .sign_up(NewUser {
                name: "Ada".into(),
                email: "ada@x.io".into(),
                password: Some("hunter2!".into()),
                ..NewUser::default()
            })
            .unwrap();
        session
            .update_document(DocumentPatch::section(&ada.document, "aboutMe", "From device one"))
            .unwrap();
        session.poll().unwrap();
    }

    // Second device: empty local store, document comes from the replica.
    let session = remote_session(&remote, &account);
    let ada = session
        .sign_in(Credentials {
            email: "ada@x.io".into(),
            password: Some("hunter2!".into()),
            ..Credentials::default()
        })
        .unwrap();
    assert_eq!(ada.document.sections["aboutMe"], "From device one");
    assert!(ada.progress.total_words > 0);
}

#[test]
fn push_outage_never_touches_the_local_save() {
    let remote = Arc::new(MockRemote::new());
    let account = Arc::new(MockAccount::new());
    let session = remote_session(&remote, &account);

    let ada = session
        .sign_up(NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            password: Some("hunter2!".into()),
            ..NewUser::default()
        })
        .unwrap();

    remote.set_fail_pushes(true);
    session
        .update_document(DocumentPatch::section(&ada.document, "aboutMe", "offline edit"))
        .unwrap();
    let outcome = session.poll().unwrap();

    assert_eq!(outcome.pushed, Some(false));
    assert_eq!(session.save_status(), SaveStatus::Saved);
    assert_eq!(session.cloud_sync_status(), CloudSyncStatus::Error);
    assert_eq!(
        session.document().unwrap().sections["aboutMe"],
        "offline edit"
    );

    // Next save after the outage recovers the cloud indicator.
    remote.set_fail_pushes(false);
    let doc = session.document().unwrap();
    session
        .update_document(DocumentPatch::section(&doc, "aboutMe", "back online"))
        .unwrap();
    session.poll().unwrap();
    assert_eq!(session.cloud_sync_status(), CloudSyncStatus::Synced);
}

#[test]
fn sign_out_flushes_the_pending_edit() {
    let account = Arc::new(MockAccount::new());
    let remote = Arc::new(MockRemote::new());
    // Long debounce: the edit is still pending when sign-out happens.
    let session = SessionFacade::with_remote(
        SyncConfig::new().with_debounce_delay(Duration::from_secs(3600)),
        Box::new(InMemoryBackend::new()),
        Arc::clone(&remote),
        Arc::clone(&account),
    );

    let ada = session
        .sign_up(NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            password: Some("hunter2!".into()),
            ..NewUser::default()
        })
        .unwrap();
    session
        .update_document(DocumentPatch::section(&ada.document, "aboutMe", "last words"))
        .unwrap();

    session.sign_out().unwrap();
    assert_eq!(account.sign_out_count(), 1);
    assert_eq!(
        remote.document(&ada.id).unwrap().sections["aboutMe"],
        "last words"
    );
}

#[test]
fn export_import_moves_a_user_between_sessions() {
    let source = SessionFacade::local_only(instant_config(), Box::new(InMemoryBackend::new()));
    let ada = source
        .sign_up(NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            ..NewUser::default()
        })
        .unwrap();
    source
        .update_document(DocumentPatch::section(&ada.document, "lifeLessons", "Never stop."))
        .unwrap();
    source.poll().unwrap();

    let bundle = source.export_active_user().unwrap();
    let value = serde_json::to_value(&bundle).unwrap();

    let target = SessionFacade::local_only(instant_config(), Box::new(InMemoryBackend::new()));
    let imported = target.import_user(&value).unwrap();
    assert_eq!(imported.document.sections["lifeLessons"], "Never stop.");
    assert_ne!(imported.id, ada.id);
    // Imported users stay inactive until they log in.
    assert!(target.current_user().is_none());
    let switched = target.switch_user(&imported.id).unwrap();
    assert_eq!(switched.id, imported.id);
}

#[test]
fn version_history_reachable_through_the_facade() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::open(dir.path()).unwrap();
    let session = SessionFacade::local_only(instant_config(), Box::new(backend));

    let ada = session
        .sign_up(NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            ..NewUser::default()
        })
        .unwrap();

    for i in 0..7 {
        let doc = session.document().unwrap();
        session
            .update_document(DocumentPatch::section(&doc, "aboutMe", format!("draft {i}")))
            .unwrap();
        session.manual_save().unwrap();
    }
    let _ = ada;

    let versions = session.versions().unwrap();
    assert_eq!(versions.len(), 5);
    // Newest first, strictly decreasing versions.
    for pair in versions.windows(2) {
        assert!(pair[0].version > pair[1].version);
    }

    let oldest = versions.last().unwrap().clone();
    let restored = session.restore_version(&oldest).unwrap();
    assert_eq!(restored.sections["aboutMe"], "draft 2");
    assert_eq!(session.versions().unwrap().len(), 5);
}

#[test]
fn blob_flow_updates_the_document() {
    let remote = Arc::new(MockRemote::new());
    let account = Arc::new(MockAccount::new());
    let session = remote_session(&remote, &account);

    let ada = session
        .sign_up(NewUser {
            name: "Ada".into(),
            email: "ada@x.io".into(),
            password: Some("hunter2!".into()),
            ..NewUser::default()
        })
        .unwrap();

    let photo = session.attach_photo("garden.jpg", b"jpegdata").unwrap();
    assert_eq!(photo.url, format!("mock://blobs/{}/garden.jpg", ada.id));
    assert_eq!(session.document().unwrap().photos.len(), 1);

    let audio = session
        .attach_audio("story.mp3", b"mp3data", Some(12.5))
        .unwrap();
    assert_eq!(audio.duration_secs, Some(12.5));

    session.detach_photo("garden.jpg").unwrap();
    assert!(session.document().unwrap().photos.is_empty());
    assert_eq!(session.document().unwrap().audio.len(), 1);
}
