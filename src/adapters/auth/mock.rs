//! Mock auth gateway for testing.
//!
//! Implements the `AuthGateway` port in memory, avoiding a real auth
//! backend. Tests drive the session lifecycle directly and observe the
//! broadcast the way the session store does.
//!
//! # Example
//!
//! ```ignore
//! use brandreach_gating::adapters::auth::MockAuthGateway;
//!
//! let gateway = MockAuthGateway::new().with_session(session);
//! let current = gateway.current_session().await?;
//! gateway.emit_sign_out();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{AuthError, Session};
use crate::ports::{AuthGateway, SessionChange};

const CHANNEL_CAPACITY: usize = 16;

/// In-memory `AuthGateway`.
pub struct MockAuthGateway {
    session: RwLock<Option<Session>>,
    /// Optional error returned by every call (for error-path testing).
    force_error: RwLock<Option<AuthError>>,
    changes: broadcast::Sender<SessionChange>,
    sign_out_calls: AtomicUsize,
}

impl MockAuthGateway {
    /// Creates a gateway with nobody signed in.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            session: RwLock::new(None),
            force_error: RwLock::new(None),
            changes,
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    /// Starts with a signed-in session.
    pub fn with_session(self, session: Session) -> Self {
        *self.session.write().unwrap() = Some(session);
        self
    }

    /// Forces every call to return the given error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Signs a session in at runtime and broadcasts the change.
    pub fn emit_sign_in(&self, session: Session) {
        *self.session.write().unwrap() = Some(session.clone());
        let _ = self.changes.send(SessionChange::SignedIn(session));
    }

    /// Replaces the session (token refresh) and broadcasts the change.
    pub fn emit_refresh(&self, session: Session) {
        *self.session.write().unwrap() = Some(session.clone());
        let _ = self.changes.send(SessionChange::TokenRefreshed(session));
    }

    /// Destroys the session and broadcasts the change.
    pub fn emit_sign_out(&self) {
        *self.session.write().unwrap() = None;
        let _ = self.changes.send(SessionChange::SignedOut);
    }

    /// Number of times `sign_out` was called through the port.
    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        Ok(self.session.read().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        self.emit_sign_out();
        Ok(())
    }
}
