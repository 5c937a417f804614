//! Error types for session operations.

use std::fmt;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Stable machine-readable reason for an authentication failure, so the UI
/// can render a specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorReason {
    /// Unknown identity or wrong password.
    BadCredentials,
    /// Sign-up with an email that already has an account.
    EmailInUse,
    /// The provider rejected the password as too weak.
    WeakPassword,
    /// The provider is throttling this client.
    RateLimited,
    /// Any other provider-reported failure.
    Other,
}

impl fmt::Display for AuthErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthErrorReason::BadCredentials => "bad-credentials",
            AuthErrorReason::EmailInUse => "email-in-use",
            AuthErrorReason::WeakPassword => "weak-password",
            AuthErrorReason::RateLimited => "rate-limited",
            AuthErrorReason::Other => "other",
        };
        f.write_str(s)
    }
}

/// Errors that can occur in user-facing session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Operation referenced a user that does not exist.
    #[error("user not found: {user_id}")]
    NotFound {
        /// The id that was looked up.
        user_id: String,
    },

    /// Operation is disallowed under the active auth mode.
    #[error("operation not supported in this mode: {operation}")]
    Unsupported {
        /// The operation that was refused.
        operation: &'static str,
    },

    /// An import bundle failed shape validation; nothing was inserted.
    #[error("invalid import bundle: {reason}")]
    InvalidImport {
        /// What was missing or malformed.
        reason: String,
    },

    /// The account provider rejected a sign-up or sign-in.
    #[error("authentication failed ({reason}): {message}")]
    Auth {
        /// Stable sub-reason.
        reason: AuthErrorReason,
        /// Provider-supplied detail.
        message: String,
    },

    /// Save or replication failure bubbled up from the engine.
    #[error(transparent)]
    Sync(#[from] memoir_sync_engine::SyncError),

    /// Local store failure.
    #[error(transparent)]
    Core(#[from] memoir_core::CoreError),
}

impl SessionError {
    /// Creates an [`SessionError::Auth`] error.
    pub fn auth(reason: AuthErrorReason, message: impl Into<String>) -> Self {
        Self::Auth {
            reason,
            message: message.into(),
        }
    }

    /// Creates an [`SessionError::InvalidImport`] error.
    pub fn invalid_import(reason: impl Into<String>) -> Self {
        Self::InvalidImport {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_reason_codes_are_stable() {
        assert_eq!(AuthErrorReason::BadCredentials.to_string(), "bad-credentials");
        assert_eq!(AuthErrorReason::EmailInUse.to_string(), "email-in-use");
        assert_eq!(AuthErrorReason::WeakPassword.to_string(), "weak-password");
        assert_eq!(AuthErrorReason::RateLimited.to_string(), "rate-limited");
    }

    #[test]
    fn error_display() {
        let err = SessionError::auth(AuthErrorReason::EmailInUse, "ada@x.io taken");
        assert!(err.to_string().contains("email-in-use"));

        let err = SessionError::Unsupported {
            operation: "switch_user",
        };
        assert!(err.to_string().contains("switch_user"));
    }
}
