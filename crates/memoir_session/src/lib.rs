//! # Memoir Session
//!
//! Multi-user session layer for Memoir: the user directory, the
//! authentication seam, data portability, and the facade an application
//! embeds.
//!
//! This crate provides:
//! - [`SessionFacade`]: the single entry point a host wires its UI to
//! - [`UserDirectory`]: user records, the active-user slot, and document
//!   routing into the save engine
//! - [`AccountService`]: the identity-provider seam, with a scriptable
//!   [`MockAccount`]
//! - [`ExportBundle`]: validated import/export of a user's full data graph
//!
//! ## Modes
//!
//! A session runs in one of two modes, fixed at construction:
//!
//! - **Local-only** ([`SessionFacade::local_only`]): identities are plain
//!   directory records, login by email needs no password, and switching
//!   between known users is free. No network is ever touched.
//! - **Remote-auth** ([`SessionFacade::with_remote`]): identities come from
//!   an [`AccountService`], documents replicate through a
//!   [`memoir_sync_engine::RemoteService`], and `switch_user` is refused
//!   since the provider requires re-authentication per user.
//!
//! ## Example
//!
//! ```
//! use memoir_session::{NewUser, SessionFacade};
//! use memoir_storage::InMemoryBackend;
//! use memoir_sync_engine::SyncConfig;
//! use memoir_core::DocumentPatch;
//!
//! let session = SessionFacade::local_only(
//!     SyncConfig::new(),
//!     Box::new(InMemoryBackend::new()),
//! );
//!
//! let ada = session.sign_up(NewUser {
//!     name: "Ada".into(),
//!     email: "ada@example.com".into(),
//!     ..NewUser::default()
//! })?;
//!
//! let patch = DocumentPatch::section(&ada.document, "aboutMe", "Born in London.");
//! session.update_document(patch)?;
//! session.manual_save()?;
//! # Ok::<(), memoir_session::SessionError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod account;
mod directory;
mod error;
mod export;
mod facade;

pub use account::{AccountService, AuthChangeCallback, MockAccount, RemoteProfile};
pub use directory::{Credentials, NewUser, UserDirectory, UserRecord, UserSummary};
pub use error::{AuthErrorReason, SessionError, SessionResult};
pub use export::{ExportBundle, ExportedUser};
pub use facade::{LocalSession, NoAccount, NoRemote, SessionFacade};
