//! Configuration for the sync engine.

use memoir_core::DEFAULT_HISTORY_LIMIT;
use std::time::Duration;

/// Configuration for save and replication behavior.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet period after the last `schedule` before a commit fires.
    pub debounce_delay: Duration,
    /// Snapshots kept per storage key.
    pub history_limit: usize,
    /// Timeout applied to every remote call.
    pub remote_timeout: Duration,
    /// Whether to push to the remote after a successful local commit.
    pub cloud_backup_enabled: bool,
}

impl SyncConfig {
    /// Creates a configuration with the reference defaults: 2 s debounce,
    /// 5 snapshots, 30 s remote timeout, cloud backup on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            debounce_delay: Duration::from_millis(2000),
            history_limit: DEFAULT_HISTORY_LIMIT,
            remote_timeout: Duration::from_secs(30),
            cloud_backup_enabled: true,
        }
    }

    /// Sets the debounce delay.
    #[must_use]
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Sets the per-key history bound.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Sets the timeout for remote calls.
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Enables or disables the replication path.
    #[must_use]
    pub fn with_cloud_backup(mut self, enabled: bool) -> Self {
        self.cloud_backup_enabled = enabled;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
