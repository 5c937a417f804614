//! Integration tests for the save engine over persistent storage.

use memoir_core::{Document, DocumentPatch};
use memoir_storage::FileBackend;
use memoir_sync_engine::{
    CloudSyncStatus, MockRemote, SaveStatus, SyncConfig, SyncEngine,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const DELAY: Duration = Duration::from_millis(2000);

fn doc(text: &str) -> Document {
    let mut doc = Document::with_standard_sections();
    doc.set_section("aboutMe", text);
    doc
}

fn file_engine(dir: &TempDir, remote: Option<Arc<MockRemote>>) -> SyncEngine<MockRemote> {
    let backend = FileBackend::open(dir.path()).unwrap();
    let engine = SyncEngine::new(SyncConfig::new(), Box::new(backend), remote);
    engine.activate("user::ada", "ada");
    engine
}

#[test]
fn commits_survive_engine_restart() {
    let dir = TempDir::new().unwrap();

    {
        let engine = file_engine(&dir, None);
        let t0 = Instant::now();
        engine.schedule_at(doc("before restart"), t0);
        engine.poll_at(t0 + DELAY).unwrap();
    }

    // A fresh engine over the same directory sees the committed state.
    let engine = file_engine(&dir, None);
    assert_eq!(
        engine.read_current().unwrap().unwrap().sections["aboutMe"],
        "before restart"
    );
    assert_eq!(engine.versions().unwrap().len(), 1);
}

#[test]
fn history_bound_holds_on_disk() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, None);

    let mut t = Instant::now();
    for i in 0..7 {
        engine.schedule_at(doc(&format!("edit {i}")), t);
        t += DELAY;
        engine.poll_at(t).unwrap();
    }

    let history = engine.versions().unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].data.sections["aboutMe"], "edit 6");
    assert!(history.windows(2).all(|w| w[0].version > w[1].version));
}

#[test]
fn restore_then_restart_keeps_the_restored_document() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, None);

    let t0 = Instant::now();
    engine.schedule_at(doc("one"), t0);
    engine.poll_at(t0 + DELAY).unwrap();
    engine.schedule_at(doc("two"), t0 + DELAY * 2);
    engine.poll_at(t0 + DELAY * 3).unwrap();

    let older = engine.versions().unwrap()[1].clone();
    engine.restore_version(&older).unwrap();
    drop(engine);

    let engine = file_engine(&dir, None);
    assert_eq!(
        engine.read_current().unwrap().unwrap().sections["aboutMe"],
        "one"
    );
    // Restore added no history entry.
    assert_eq!(engine.versions().unwrap().len(), 2);
}

#[test]
fn remote_outage_then_recovery() {
    let dir = TempDir::new().unwrap();
    let remote = Arc::new(MockRemote::new());
    let engine = file_engine(&dir, Some(Arc::clone(&remote)));

    remote.set_fail_pushes(true);
    let t0 = Instant::now();
    engine.schedule_at(doc("offline edit"), t0);
    engine.poll_at(t0 + DELAY).unwrap();

    assert_eq!(engine.save_status(), SaveStatus::Saved);
    assert_eq!(engine.cloud_sync_status(), CloudSyncStatus::Error);
    assert!(remote.document("ada").is_none());

    // Service comes back; the next save replicates and clears the indicator.
    remote.set_fail_pushes(false);
    engine.schedule_at(doc("online edit"), t0 + DELAY * 2);
    engine.poll_at(t0 + DELAY * 3).unwrap();

    assert_eq!(engine.cloud_sync_status(), CloudSyncStatus::Synced);
    assert_eq!(
        remote.document("ada").unwrap().sections["aboutMe"],
        "online edit"
    );
}

#[test]
fn manual_save_races_debounced_save_without_reordering_local_commits() {
    let dir = TempDir::new().unwrap();
    let remote = Arc::new(MockRemote::new());
    let engine = file_engine(&dir, Some(Arc::clone(&remote)));

    let t0 = Instant::now();
    engine.schedule_at(doc("draft"), t0);
    // Manual save consumes the pending document before the timer fires.
    engine.manual_save().unwrap().unwrap();
    engine.schedule_at(doc("final"), t0 + Duration::from_millis(100));
    engine.poll_at(t0 + Duration::from_millis(100) + DELAY).unwrap();

    let history = engine.versions().unwrap();
    assert_eq!(history.len(), 2);
    // Local commits are totally ordered; the remote ends with the last write.
    assert!(history[0].version > history[1].version);
    assert_eq!(history[0].data.sections["aboutMe"], "final");
    assert_eq!(remote.document("ada").unwrap().sections["aboutMe"], "final");
    assert_eq!(remote.push_count(), 2);
}

#[test]
fn patch_pipeline_end_to_end() {
    let dir = TempDir::new().unwrap();
    let engine = file_engine(&dir, None);

    let mut document = Document::with_standard_sections();
    document.apply(DocumentPatch::section(&document, "aboutMe", "Hi"));

    let t0 = Instant::now();
    engine.schedule_at(document, t0);
    engine.poll_at(t0 + DELAY).unwrap();

    assert_eq!(engine.save_status(), SaveStatus::Saved);
    let stored = engine.read_current().unwrap().unwrap();
    assert_eq!(stored.sections["aboutMe"], "Hi");
    assert_eq!(stored.sections.len(), 6);
}
