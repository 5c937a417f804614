//! # Memoir Core
//!
//! Document model and versioned local store for Memoir.
//!
//! This crate provides:
//! - The [`Document`] content graph (sections, photos, audio, timeline,
//!   memories) and the [`DocumentPatch`] shallow merge rule
//! - Immutable, versioned [`Snapshot`]s of a document
//! - [`VersionedLocalStore`]: durable current-value + bounded-history
//!   storage over a [`memoir_storage::StorageBackend`]
//! - [`ProgressSummary`]: the derived completion metrics cached on every
//!   commit
//!
//! ## Key Invariants
//!
//! - Snapshot versions are strictly monotonic per key, even on clock ties
//! - History is most-recent-first and never longer than the configured limit
//! - Restoring a snapshot rewrites the current slot without touching history
//! - A patch replaces top-level fields; nothing is deep-merged

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod progress;
mod snapshot;
mod store;

pub use document::{
    AudioRef, Document, DocumentPatch, MemoryEntry, PhotoRef, TimelineEntry, STANDARD_SECTIONS,
};
pub use error::{CoreError, CoreResult};
pub use progress::ProgressSummary;
pub use snapshot::Snapshot;
pub use store::{VersionedLocalStore, DEFAULT_HISTORY_LIMIT};
