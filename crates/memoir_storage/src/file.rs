//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const SLOT_EXTENSION: &str = "slot";

/// A file-based slot store.
///
/// Each key maps to one file under a root directory, with the key
/// percent-escaped into a filesystem-safe name. Data survives process
/// restarts.
///
/// # Durability
///
/// `put` writes a temporary file, calls `File::sync_all()`, then renames it
/// over the slot. A successful return means the slot is on disk; a crash
/// mid-write leaves the previous contents intact.
///
/// # Thread Safety
///
/// This backend is thread-safe. A single internal lock serializes writes;
/// the slot-per-file layout keeps reads consistent without it.
///
/// # Example
///
/// ```no_run
/// use memoir_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("memoir-data")).unwrap();
/// backend.put("profile", b"persistent data").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend rooted at `root`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the root directory of this backend.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let mut name = escape_key(key);
        name.push('.');
        name.push_str(SLOT_EXTENSION);
        Ok(self.root.join(name))
    }
}

/// Escapes a key into a filesystem-safe file stem.
///
/// Alphanumerics plus `-` `_` `.` pass through; everything else becomes
/// `%XX` so distinct keys never collide.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

/// Reverses [`escape_key`]. Returns `None` for names this backend did not
/// produce.
fn unescape_key(name: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(name.len());
    let mut iter = name.bytes();
    while let Some(b) = iter.next() {
        if b == b'%' {
            let hi = iter.next()?;
            let lo = iter.next()?;
            let hex = [hi, lo];
            let hex = std::str::from_utf8(&hex).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
        } else {
            bytes.push(b);
        }
    }
    String::from_utf8(bytes).ok()
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        let _guard = self.write_lock.lock();

        let tmp_path = path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(bytes).map_err(map_full)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.slot_path(key)?.is_file())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Some(key) = unescape_key(stem) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }
}

/// Maps an out-of-space I/O error to the quota condition.
fn map_full(e: std::io::Error) -> StorageError {
    // StorageFull is stable only on nightly; fall back to the raw OS code.
    if e.raw_os_error() == Some(28) {
        // ENOSPC
        StorageError::QuotaExceeded {
            requested: 0,
            limit: 0,
        }
    } else {
        StorageError::Io(e)
    }
}
