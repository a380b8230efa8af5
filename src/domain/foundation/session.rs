//! Session types for the gating domain.
//!
//! A `Session` is the cached, reactive copy of what the auth sub-service
//! knows about one authenticated browser session. It has no provider
//! dependencies; any auth backend can populate it via the `AuthGateway`
//! port.
//!
//! Gating invariant: a session whose email is unconfirmed is treated as
//! unauthenticated everywhere. `is_verified()` is the single place that
//! check lives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Timestamp, UserId};

/// Arbitrary user metadata carried by the auth sub-service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Display name chosen at signup, if any.
    pub display_name: Option<String>,

    /// Avatar URL, if any.
    pub avatar_url: Option<String>,
}

/// One authenticated browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The user this session belongs to; equals the CoreProfile primary key.
    pub user_id: UserId,

    /// Email address on the account.
    pub email: String,

    /// When the email was confirmed. `None` means unverified, and an
    /// unverified session is unauthenticated for all gating purposes.
    pub email_confirmed_at: Option<Timestamp>,

    /// Opaque access token presented to the row store.
    pub access_token: String,

    /// Arbitrary user metadata (display name, avatar).
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl Session {
    /// Creates a session.
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        email_confirmed_at: Option<Timestamp>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            email_confirmed_at,
            access_token: access_token.into(),
            metadata: UserMetadata::default(),
        }
    }

    /// Attaches metadata.
    pub fn with_metadata(mut self, metadata: UserMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// True when the email has been confirmed.
    pub fn is_verified(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// True when the session carries a non-empty access token AND a
    /// confirmed email. This is the authority check the profile loader
    /// re-derives before touching the row store.
    pub fn can_read_rows(&self) -> bool {
        !self.access_token.is_empty() && self.is_verified()
    }
}

/// Errors from the auth sub-service.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The current token is missing, malformed, or rejected.
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Sign-in was rejected (bad credentials, unknown user).
    #[error("Sign-in rejected")]
    SignInRejected,

    /// The auth sub-service is unreachable or misbehaving.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified_session() -> Session {
        Session::new(
            UserId::new(),
            "casey@example.com",
            Some(Timestamp::now()),
            "token-abc",
        )
    }

    #[test]
    fn verified_session_can_read_rows() {
        assert!(verified_session().is_verified());
        assert!(verified_session().can_read_rows());
    }

    #[test]
    fn unconfirmed_email_blocks_row_reads() {
        let session = Session::new(UserId::new(), "new@example.com", None, "token-abc");
        assert!(!session.is_verified());
        assert!(!session.can_read_rows());
    }

    #[test]
    fn empty_access_token_blocks_row_reads_even_when_verified() {
        let session = Session::new(UserId::new(), "casey@example.com", Some(Timestamp::now()), "");
        assert!(session.is_verified());
        assert!(!session.can_read_rows());
    }

    #[test]
    fn auth_error_is_transient_only_for_service_failures() {
        assert!(AuthError::service_unavailable("connection refused").is_transient());
        assert!(!AuthError::InvalidSession.is_transient());
        assert!(!AuthError::SignInRejected.is_transient());
    }
}
