//! Derived writing-progress metrics.

use crate::document::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached completion metrics for one user's biography.
///
/// Always recomputed from the document on commit, never hand-edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Total whitespace-separated words across all sections.
    pub total_words: usize,
    /// Sections whose trimmed text exceeds 50 characters.
    pub completed_sections: usize,
    /// Timestamp of the last successful local save, if any.
    pub last_saved: Option<DateTime<Utc>>,
}

impl ProgressSummary {
    /// Computes the summary for `document`.
    #[must_use]
    pub fn of(document: &Document, last_saved: Option<DateTime<Utc>>) -> Self {
        Self {
            total_words: document.word_count(),
            completed_sections: document.completed_section_count(),
            last_saved,
        }
    }
}
