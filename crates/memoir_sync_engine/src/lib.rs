//! # Memoir Sync Engine
//!
//! Debounced save engine for Memoir.
//!
//! This crate provides:
//! - [`SyncEngine`]: trailing-debounce auto-save into a
//!   [`memoir_core::VersionedLocalStore`], then best-effort replication to a
//!   [`RemoteService`]
//! - Independent [`SaveStatus`] (local-commit path) and [`CloudSyncStatus`]
//!   (replication path) signals for the UI
//! - The [`RemoteService`] trait and a scriptable [`MockRemote`]
//!
//! ## Architecture
//!
//! The engine implements a **local-durability-first** model:
//! 1. Edits are scheduled; only the last document in a debounce window
//!    survives (cancel-and-restart, not a queue)
//! 2. On the deadline, the document is committed to the local store
//! 3. Only after the local commit succeeds is a push attempted
//!
//! A push failure never rolls back or re-labels the local commit: local
//! durability and remote replication are independent guarantees.
//!
//! ## Key Invariants
//!
//! - One commit per debounce window, holding the last scheduled document
//! - A superseded pending document is discarded, never committed
//! - `SaveStatus` is only ever changed by the local-commit path
//! - `CloudSyncStatus` is only ever changed by the replication path
//! - No push is attempted after a failed local commit
//!
//! The engine is caller-driven: the host event loop calls [`SyncEngine::poll`]
//! each tick, and tests drive [`SyncEngine::poll_at`] with explicit instants.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod remote;
mod status;

pub use config::SyncConfig;
pub use engine::{CommitOutcome, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use remote::{BlobEntry, MockRemote, RemoteService};
pub use status::{CloudSyncStatus, SaveStatus};
