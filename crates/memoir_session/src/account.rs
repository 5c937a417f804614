//! Account service abstraction for remote-backed sessions.

use crate::error::{AuthErrorReason, SessionError, SessionResult};
use chrono::{DateTime, Utc};
use memoir_core::Document;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// The profile an account provider returns on sign-up or sign-in.
#[derive(Debug, Clone)]
pub struct RemoteProfile {
    /// Provider-assigned stable user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Avatar URL, when the provider stores one.
    pub avatar_url: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// The biography document stored with the profile, if any.
    pub document: Option<Document>,
}

/// Callback observing provider-side session changes: `Some` with the
/// profile on sign-in, `None` on sign-out.
pub type AuthChangeCallback = Box<dyn Fn(Option<&RemoteProfile>) + Send + Sync>;

/// The remote identity provider Memoir authenticates against.
///
/// Optional: a session constructed without one runs in local-only mode,
/// where identities are plain directory records and no authentication
/// happens.
pub trait AccountService: Send + Sync {
    /// Creates a new account and returns its profile.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Auth`] with a stable sub-reason
    /// (`email-in-use`, `weak-password`, `rate-limited`, ...) on rejection.
    fn create_account(&self, email: &str, password: &str, name: &str)
        -> SessionResult<RemoteProfile>;

    /// Signs an existing account in and returns its profile.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Auth`] on rejection.
    fn sign_in(&self, email: &str, password: &str) -> SessionResult<RemoteProfile>;

    /// Ends the provider-side session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Auth`] if the provider reports a failure.
    fn sign_out(&self) -> SessionResult<()>;

    /// Registers a callback observing provider-side session changes.
    fn on_auth_change(&self, callback: AuthChangeCallback);
}

/// A scriptable in-memory account provider for testing.
#[derive(Default)]
pub struct MockAccount {
    accounts: RwLock<BTreeMap<String, (String, RemoteProfile)>>,
    fail_with: RwLock<Option<AuthErrorReason>>,
    signed_out: RwLock<u64>,
    listeners: RwLock<Vec<AuthChangeCallback>>,
}

impl MockAccount {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with the given reason.
    pub fn set_fail_with(&self, reason: Option<AuthErrorReason>) {
        *self.fail_with.write() = reason;
    }

    /// Number of completed sign-outs.
    #[must_use]
    pub fn sign_out_count(&self) -> u64 {
        *self.signed_out.read()
    }

    /// Attaches a stored document to an existing account, as if it had been
    /// replicated earlier.
    pub fn seed_document(&self, email: &str, document: Document) {
        if let Some((_, profile)) = self.accounts.write().get_mut(email) {
            profile.document = Some(document);
        }
    }

    fn notify(&self, profile: Option<&RemoteProfile>) {
        for listener in self.listeners.read().iter() {
            listener(profile);
        }
    }

    fn check_scripted_failure(&self) -> SessionResult<()> {
        if let Some(reason) = *self.fail_with.read() {
            return Err(SessionError::auth(reason, "scripted failure"));
        }
        Ok(())
    }
}

impl AccountService for MockAccount {
    fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> SessionResult<RemoteProfile> {
        self.check_scripted_failure()?;

        let mut accounts = self.accounts.write();
        if accounts.contains_key(email) {
            return Err(SessionError::auth(
                AuthErrorReason::EmailInUse,
                format!("an account already exists for {email}"),
            ));
        }
        if password.chars().count() < 6 {
            return Err(SessionError::auth(
                AuthErrorReason::WeakPassword,
                "password must be at least 6 characters",
            ));
        }

        let profile = RemoteProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            created_at: Utc::now(),
            document: None,
        };
        accounts.insert(email.to_string(), (password.to_string(), profile.clone()));
        drop(accounts);
        self.notify(Some(&profile));
        Ok(profile)
    }

    fn sign_in(&self, email: &str, password: &str) -> SessionResult<RemoteProfile> {
        self.check_scripted_failure()?;

        let profile = match self.accounts.read().get(email) {
            Some((stored, profile)) if stored == password => profile.clone(),
            _ => {
                return Err(SessionError::auth(
                    AuthErrorReason::BadCredentials,
                    "unknown email or wrong password",
                ))
            }
        };
        self.notify(Some(&profile));
        Ok(profile)
    }

    fn sign_out(&self) -> SessionResult<()> {
        *self.signed_out.write() += 1;
        self.notify(None);
        Ok(())
    }

    fn on_auth_change(&self, callback: AuthChangeCallback) {
        self.listeners.write().push(callback);
    }
}
