//! Session store: the cached, reactive copy of the auth session.
//!
//! On start it performs one fetch against the auth sub-service and then
//! follows push updates through the gateway subscription. `loading` is true
//! only until that first fetch resolves; later updates flow through the
//! subscription without touching `loading` again.
//!
//! Every asynchronous continuation checks a liveness flag before mutating
//! state, and teardown both flips the flag and cancels the listener task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::foundation::{AuthError, Session};
use crate::domain::gating::Destination;
use crate::ports::{AuthGateway, Navigator, SessionChange};

/// What a consumer sees when it asks for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    /// True until the first fetch has resolved.
    pub loading: bool,
}

struct Shared {
    session: RwLock<Option<Session>>,
    loading: AtomicBool,
    alive: AtomicBool,
}

impl Shared {
    fn apply(&self, change: SessionChange) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        match change {
            SessionChange::SignedIn(session) | SessionChange::TokenRefreshed(session) => {
                *self.session.write().unwrap() = Some(session);
            }
            SessionChange::SignedOut => {
                *self.session.write().unwrap() = None;
            }
        }
    }
}

/// Cached session plus subscription plumbing.
pub struct SessionStore {
    auth: Arc<dyn AuthGateway>,
    navigator: Arc<dyn Navigator>,
    shared: Arc<Shared>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Creates a store in the loading state. Call [`SessionStore::start`]
    /// to perform the initial fetch and begin following updates.
    pub fn new(auth: Arc<dyn AuthGateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            auth,
            navigator,
            shared: Arc::new(Shared {
                session: RwLock::new(None),
                loading: AtomicBool::new(true),
                alive: AtomicBool::new(true),
            }),
            listener: Mutex::new(None),
        }
    }

    /// Performs the one initial fetch and spawns the subscription listener.
    ///
    /// The subscription is opened before the fetch so a change racing the
    /// first fetch is not lost.
    pub async fn start(&self) {
        let mut changes = self.auth.subscribe();

        let fetched = match self.auth.current_session().await {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "initial session fetch failed");
                None
            }
        };
        if self.shared.alive.load(Ordering::SeqCst) {
            *self.shared.session.write().unwrap() = fetched;
            self.shared.loading.store(false, Ordering::SeqCst);
        }

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        if !shared.alive.load(Ordering::SeqCst) {
                            return;
                        }
                        debug!(?change, "session change received");
                        shared.apply(change);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session change stream lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
                }
            }
        });
        *self.listener.lock().unwrap() = Some(handle);
    }

    /// The cached session and loading flag.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.shared.session.read().unwrap().clone(),
            loading: self.shared.loading.load(Ordering::SeqCst),
        }
    }

    /// Signs out through the gateway, clears the cache, and navigates to
    /// the public landing page.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await?;
        if self.shared.alive.load(Ordering::SeqCst) {
            *self.shared.session.write().unwrap() = None;
        }
        self.navigator.navigate(Destination::Landing, true);
        Ok(())
    }

    /// Tears the store down: flips the liveness flag and cancels the
    /// listener so no continuation mutates state after unmount.
    pub fn shutdown(&self) {
        self.shared.alive.store(false, Ordering::SeqCst);
        if let Some(handle) = self.listener.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}
