//! # Memoir Storage
//!
//! Keyed slot-storage backends for Memoir.
//!
//! This crate provides:
//! - The [`StorageBackend`] trait: a durable key → bytes slot store
//! - [`InMemoryBackend`] for tests and ephemeral sessions
//! - [`FileBackend`] for persistent storage (one file per slot)
//!
//! Backends are **opaque byte stores**. Memoir owns all payload
//! interpretation - backends do not understand snapshots, version
//! histories, or documents.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
