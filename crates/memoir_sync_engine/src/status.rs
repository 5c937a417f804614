//! Save and replication status signals.

/// The state of the local-commit path.
///
/// Deliberately decoupled from [`CloudSyncStatus`]: a local save can succeed
/// while replication fails, and the UI must be able to show both at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing has been scheduled or saved yet.
    #[default]
    Idle,
    /// A commit is in progress.
    Saving,
    /// The last commit reached durable local storage.
    Saved,
    /// The last commit failed; stays set until a later commit succeeds.
    Error,
}

impl SaveStatus {
    /// Returns true if the last local commit failed.
    ///
    /// The UI renders this as a persistent indicator until the next
    /// successful save clears it.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, SaveStatus::Error)
    }

    /// Returns true if the latest edits are durably saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// The state of the best-effort replication path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloudSyncStatus {
    /// The remote holds the last pushed document (or nothing was pushed yet).
    #[default]
    Synced,
    /// A push is in flight.
    Syncing,
    /// The last push failed or timed out. Local durability is unaffected;
    /// the UI shows this as a secondary, non-blocking indicator.
    Error,
}

impl CloudSyncStatus {
    /// Returns true if the last push failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, CloudSyncStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(SaveStatus::default(), SaveStatus::Idle);
        assert_eq!(CloudSyncStatus::default(), CloudSyncStatus::Synced);
    }

    #[test]
    fn helpers() {
        assert!(SaveStatus::Error.is_error());
        assert!(SaveStatus::Saved.is_saved());
        assert!(!SaveStatus::Saving.is_saved());
        assert!(CloudSyncStatus::Error.is_error());
        assert!(!CloudSyncStatus::Syncing.is_error());
    }
}
