//! Gate controller: the single post-authentication decision point.
//!
//! An activation observes the session, performs its own direct core-profile
//! fetch (bypassing the loader's view, so a stale snapshot from a previous
//! route can never drive a redirect loop), and issues at most one
//! navigation. A watchdog races the fetch so a hung backend can never leave
//! the caller on a spinner forever.
//!
//! All decision rules live in [`crate::domain::gating::machine`]; this type
//! is the async plumbing that feeds facts in and executes the returned
//! actions. The per-activation [`GatePhase`] under a mutex is the one-shot
//! guard: whichever of the fetch completion and the watchdog applies its
//! event first wins, and the loser observes `Redirected` and does nothing.
//!
//! Teardown (drop or [`GateController::shutdown`]) flips a liveness flag
//! that every async continuation consults before mutating state, so a
//! decision task outliving its controller mutates nothing and never
//! navigates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::domain::foundation::{StoreError, UserId};
use crate::domain::gating::machine::step;
use crate::domain::gating::{Destination, GateAction, GateEvent, GatePhase};
use crate::domain::profile::CoreProfileRecord;
use crate::ports::{AuthGateway, Navigator, ProfileStore};

/// Default watchdog deadline for one activation.
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_millis(3000);

struct Inner {
    store: Arc<dyn ProfileStore>,
    auth: Arc<dyn AuthGateway>,
    navigator: Arc<dyn Navigator>,
    phase: Mutex<GatePhase>,
    /// Cleared on teardown; every async continuation consults it before
    /// mutating state or navigating.
    alive: AtomicBool,
}

impl Inner {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Feeds one event through the machine under the guard lock.
    fn apply(&self, event: GateEvent) -> GateAction {
        let mut phase = self.phase.lock().unwrap();
        let (next, action) = step(*phase, event);
        *phase = next;
        action
    }

    /// Executes a non-bootstrap action. Terminal actions navigate with
    /// `replace = true`; the watchdog (if still pending) is dropped by the
    /// caller right after.
    async fn execute(&self, action: GateAction) {
        if !self.is_alive() {
            return;
        }
        match action {
            GateAction::Stay => {}
            GateAction::Bootstrap => {
                // Bootstrap is only produced inside `decide`, which handles
                // it inline; reaching here means the machine was misfed.
                error!("bootstrap action escaped the decide path");
            }
            GateAction::SignOutToLanding => {
                if let Err(error) = self.auth.sign_out().await {
                    warn!(%error, "sign-out failed during gating, navigating anyway");
                }
                info!("unverified session signed out, returning to landing");
                self.navigator.navigate(Destination::Landing, true);
            }
            GateAction::Navigate(destination) => {
                info!(destination = %destination, "gate decision");
                self.navigator.navigate(destination, true);
            }
        }
    }

    /// The direct fetch path: read the core row, bootstrapping it when
    /// missing, and feed the outcome through the machine.
    async fn decide(self: Arc<Self>, user_id: UserId) {
        let event = match self.store.find_core(&user_id).await {
            Ok(Some(record)) => GateEvent::ProfileFound(record),
            Ok(None) | Err(StoreError::NotFound) => {
                if !self.is_alive() {
                    return;
                }
                match self.apply(GateEvent::ProfileMissing) {
                    GateAction::Bootstrap => self.bootstrap(user_id).await,
                    // The watchdog (or a racing completion) got there first.
                    _ => return,
                }
            }
            Err(error) => {
                error!(%user_id, %error, "direct profile fetch failed");
                GateEvent::FetchFailed
            }
        };
        if !self.is_alive() {
            return;
        }
        let action = self.apply(event);
        self.execute(action).await;
    }

    async fn bootstrap(&self, user_id: UserId) -> GateEvent {
        if !self.is_alive() {
            // The caller's liveness check discards the event.
            return GateEvent::FetchFailed;
        }
        let record = CoreProfileRecord::bootstrap(user_id);
        match self.store.insert_core(&record).await {
            Ok(()) => {
                info!(%user_id, "core profile bootstrapped");
                GateEvent::BootstrapDone
            }
            // A concurrent activation won the insert; same outcome.
            Err(StoreError::UniqueViolation) => {
                debug!(%user_id, "bootstrap row already exists");
                GateEvent::BootstrapDone
            }
            Err(error) => {
                error!(%user_id, %error, "core profile bootstrap failed");
                GateEvent::FetchFailed
            }
        }
    }
}

/// One gate activation per instance; `activate` is safe to call again after
/// a decision (it no-ops).
pub struct GateController {
    inner: Arc<Inner>,
    timeout: Duration,
}

impl GateController {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        auth: Arc<dyn AuthGateway>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                auth,
                navigator,
                phase: Mutex::new(GatePhase::Idle),
                alive: AtomicBool::new(true),
            }),
            timeout: DEFAULT_DECISION_TIMEOUT,
        }
    }

    /// Overrides the watchdog deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The current phase of this activation.
    pub fn phase(&self) -> GatePhase {
        *self.inner.phase.lock().unwrap()
    }

    /// Tears the activation down: flips the liveness flag so a detached
    /// decision task that resolves later mutates nothing and never
    /// navigates. Cancelling the `activate` future drops the watchdog.
    pub fn shutdown(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    /// Runs one activation to its decision (or to a non-decision: auth
    /// pending and absent-session states take no action).
    pub async fn activate(&self) {
        if self.phase() == GatePhase::Redirected {
            return;
        }

        let session = match self.inner.auth.current_session().await {
            Ok(session) => session,
            Err(error) => {
                // Auth has not settled; stay in loading and wait for the
                // caller to re-trigger.
                debug!(%error, "auth not resolved, gate holding");
                let _ = self.inner.apply(GateEvent::AuthPending);
                return;
            }
        };

        let Some(session) = session else {
            // The caller route redirects unauthenticated visitors; the gate
            // only acts when a session may exist.
            let _ = self.inner.apply(GateEvent::SessionAbsent);
            return;
        };

        if !session.is_verified() {
            let action = self.inner.apply(GateEvent::SessionUnverified);
            self.inner.execute(action).await;
            return;
        }

        let _ = self.inner.apply(GateEvent::SessionVerified);
        let user_id = session.user_id;

        let decide = tokio::spawn(Arc::clone(&self.inner).decide(user_id));
        tokio::select! {
            joined = decide => {
                if let Err(error) = joined {
                    error!(%error, "gate decision task failed");
                    let action = self.inner.apply(GateEvent::FetchFailed);
                    self.inner.execute(action).await;
                }
            }
            () = tokio::time::sleep(self.timeout) => {
                let action = self.inner.apply(GateEvent::WatchdogFired);
                if action.is_terminal() {
                    warn!(timeout_ms = self.timeout.as_millis() as u64,
                          "gate decision timed out, failing safe to landing");
                }
                self.inner.execute(action).await;
                // The detached fetch keeps running; when it resolves it
                // finds the guard set and does nothing.
            }
        }
    }
}

impl Drop for GateController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
