//! The biography document content graph and its merge rule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The section keys every new biography starts with.
pub const STANDARD_SECTIONS: [&str; 6] = [
    "aboutMe",
    "earlyYears",
    "familyLife",
    "workCareer",
    "proudMoments",
    "lifeLessons",
];

/// A reference to a photo stored with the remote blob service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    /// Stable identifier (the blob name).
    pub id: String,
    /// Human-readable file name.
    pub name: String,
    /// Download URL returned by the blob service.
    pub url: String,
    /// ISO-8601 upload time.
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// A reference to an audio recording stored with the remote blob service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRef {
    /// Stable identifier (the blob name).
    pub id: String,
    /// Human-readable file name.
    pub name: String,
    /// Download URL returned by the blob service.
    pub url: String,
    /// Recording length in seconds, when known.
    pub duration_secs: Option<f64>,
    /// ISO-8601 upload time.
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// One entry on the life timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Stable identifier.
    pub id: String,
    /// The year the event took place.
    pub year: i32,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
}

/// A free-form special memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    /// Stable identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// The memory text.
    pub text: String,
}

/// The full editable content graph for one user.
///
/// Every field is optional on the wire so that slots written by older
/// releases (or hand-edited exports) still load; absent fields default to
/// empty.
///
/// # Invariants
///
/// - Section keys are unique (enforced by the map)
/// - `timeline` is sorted by `year` ascending after every insert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Ordered section key → section text.
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
    /// Photo references.
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    /// Audio recording references.
    #[serde(default)]
    pub audio: Vec<AudioRef>,
    /// Life timeline, sorted by year ascending.
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    /// Free-form special memories.
    #[serde(default, rename = "specialMemories")]
    pub memories: Vec<MemoryEntry>,
    /// User-assigned tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document seeded with the six standard biography sections,
    /// all empty.
    #[must_use]
    pub fn with_standard_sections() -> Self {
        let mut doc = Self::default();
        for key in STANDARD_SECTIONS {
            doc.sections.insert(key.to_string(), String::new());
        }
        doc
    }

    /// Sets the text of one section, inserting the key if new.
    pub fn set_section(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.sections.insert(key.into(), text.into());
    }

    /// Inserts a timeline entry, keeping the timeline sorted by year.
    pub fn add_timeline_entry(&mut self, entry: TimelineEntry) {
        let pos = self
            .timeline
            .partition_point(|existing| existing.year <= entry.year);
        self.timeline.insert(pos, entry);
    }

    /// Appends a special memory.
    pub fn add_memory(&mut self, memory: MemoryEntry) {
        self.memories.push(memory);
    }

    /// Appends a photo reference.
    pub fn add_photo(&mut self, photo: PhotoRef) {
        self.photos.push(photo);
    }

    /// Appends an audio reference.
    pub fn add_audio(&mut self, audio: AudioRef) {
        self.audio.push(audio);
    }

    /// Total whitespace-separated words across all sections.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.sections
            .values()
            .map(|text| text.split_whitespace().count())
            .sum()
    }

    /// Number of sections whose trimmed text is long enough to count as
    /// complete (more than 50 characters).
    #[must_use]
    pub fn completed_section_count(&self) -> usize {
        self.sections
            .values()
            .filter(|text| text.trim().chars().count() > 50)
            .count()
    }

    /// Applies a patch: each field present in the patch fully replaces the
    /// corresponding field of this document.
    ///
    /// Nothing is deep-merged. A replaced timeline is re-sorted so the
    /// year-ascending invariant holds regardless of the caller's ordering.
    pub fn apply(&mut self, patch: DocumentPatch) {
        if let Some(sections) = patch.sections {
            self.sections = sections;
        }
        if let Some(photos) = patch.photos {
            self.photos = photos;
        }
        if let Some(audio) = patch.audio {
            self.audio = audio;
        }
        if let Some(mut timeline) = patch.timeline {
            timeline.sort_by_key(|entry| entry.year);
            self.timeline = timeline;
        }
        if let Some(memories) = patch.memories {
            self.memories = memories;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }
}

/// A partial update to a [`Document`].
///
/// Fields left `None` are untouched; fields present replace the stored
/// value wholesale (shallow top-level replace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    /// Replacement section map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<BTreeMap<String, String>>,
    /// Replacement photo list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<PhotoRef>>,
    /// Replacement audio list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<AudioRef>>,
    /// Replacement timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEntry>>,
    /// Replacement memories list.
    #[serde(
        default,
        rename = "specialMemories",
        skip_serializing_if = "Option::is_none"
    )]
    pub memories: Option<Vec<MemoryEntry>>,
    /// Replacement tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl DocumentPatch {
    /// A patch that replaces only the section map.
    #[must_use]
    pub fn sections(sections: BTreeMap<String, String>) -> Self {
        Self {
            sections: Some(sections),
            ..Self::default()
        }
    }

    /// A patch that replaces a single section, keeping the rest of `current`.
    #[must_use]
    pub fn section(current: &Document, key: impl Into<String>, text: impl Into<String>) -> Self {
        let mut sections = current.sections.clone();
        sections.insert(key.into(), text.into());
        Self::sections(sections)
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
