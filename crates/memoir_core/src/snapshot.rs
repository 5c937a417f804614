//! Immutable, versioned captures of a document.

use crate::document::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable capture of a [`Document`] at a point in time.
///
/// Snapshots are never mutated after creation. `version` numbers are
/// wall-clock epoch millis, bumped past the previous version on a clock tie
/// so ordering per storage key is always strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The captured document.
    pub data: Document,
    /// When the capture was taken.
    pub timestamp: DateTime<Utc>,
    /// Strictly increasing version number per storage key.
    pub version: u64,
}

impl Snapshot {
    /// Captures `data` now, with a version strictly greater than
    /// `previous_version`.
    pub(crate) fn capture(data: Document, previous_version: Option<u64>) -> Self {
        let now = Utc::now();
        let clock = now.timestamp_millis().max(0) as u64;
        let version = match previous_version {
            Some(prev) if clock <= prev => prev + 1,
            _ => clock,
        };
        Self {
            data,
            timestamp: now,
            version,
        }
    }
}
