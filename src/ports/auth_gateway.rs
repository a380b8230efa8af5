//! AuthGateway port for the auth sub-service.
//!
//! The gateway owns the session lifecycle: it is created on sign-in,
//! replaced on token refresh, and destroyed on sign-out or expiry. The
//! session store keeps a cached copy and follows push updates through
//! [`AuthGateway::subscribe`].

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{AuthError, Session};

/// A push notification about the session lifecycle.
#[derive(Debug, Clone)]
pub enum SessionChange {
    /// A session was created.
    SignedIn(Session),

    /// The access token was refreshed; the session was replaced.
    TokenRefreshed(Session),

    /// The session was destroyed.
    SignedOut,
}

impl SessionChange {
    /// The session carried by the change, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionChange::SignedIn(s) | SessionChange::TokenRefreshed(s) => Some(s),
            SessionChange::SignedOut => None,
        }
    }
}

/// Access to the auth sub-service.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `current_session` when nobody is signed in
/// - Deliver every lifecycle change to all live subscribers
/// - Make `sign_out` observable through the subscription (a `SignedOut`
///   change) in addition to its return value
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// The current session, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Subscribe to session lifecycle changes. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;

    /// Destroy the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    #[test]
    fn session_change_exposes_the_carried_session() {
        let session = Session::new(UserId::new(), "a@b.c", Some(Timestamp::now()), "tok");

        assert!(SessionChange::SignedIn(session.clone()).session().is_some());
        assert!(SessionChange::TokenRefreshed(session).session().is_some());
        assert!(SessionChange::SignedOut.session().is_none());
    }

    #[test]
    fn auth_gateway_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn AuthGateway) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn AuthGateway>>();
    }
}
