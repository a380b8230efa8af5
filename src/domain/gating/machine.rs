//! The gate state machine, as a pure transition function.
//!
//! The controller feeds every new fact (session settled, fetch resolved,
//! watchdog fired) through [`step`] and executes the returned action. All
//! ordering rules live here, synchronously and without any scheduler
//! dependence; the async controller is only plumbing around this function.
//!
//! `Redirected` is absorbing: once any transition has produced a terminal
//! action, every later event is a no-op. That is the one-shot guard: an
//! explicit per-activation state, not a shared flag, so concurrent
//! activations (two tabs) cannot observe each other.

use crate::domain::profile::CoreProfileRecord;

use super::{destination_for, Destination};

/// Lifecycle of one gate activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Nothing trustworthy has been observed yet.
    Idle,

    /// A verified session exists; the direct profile fetch and the
    /// watchdog are racing.
    Deciding,

    /// A terminal action has been issued. Absorbing.
    Redirected,
}

/// A fact the controller observed.
#[derive(Debug, Clone, PartialEq)]
pub enum GateEvent {
    /// The auth state has not resolved yet.
    AuthPending,

    /// Auth resolved with no session. The caller route handles login
    /// redirects; the gate takes no action.
    SessionAbsent,

    /// A session exists but its email is unconfirmed.
    SessionUnverified,

    /// A verified session exists; the decision race may start.
    SessionVerified,

    /// The direct core-profile fetch found a row.
    ProfileFound(CoreProfileRecord),

    /// The direct fetch reported "no rows": bootstrap is required.
    ProfileMissing,

    /// The bootstrap insert succeeded, or collided with a concurrent
    /// bootstrap (unique violation), which is the same thing.
    BootstrapDone,

    /// The fetch or insert failed fatally.
    FetchFailed,

    /// The watchdog deadline passed without a decision.
    WatchdogFired,
}

/// What the controller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// Nothing; wait for the next fact.
    Stay,

    /// Insert the bootstrap core-profile row, then feed `BootstrapDone`
    /// or `FetchFailed` back in.
    Bootstrap,

    /// Sign the session out, then navigate to the landing page.
    SignOutToLanding,

    /// Navigate (replace, not push). Terminal.
    Navigate(Destination),
}

impl GateAction {
    /// True for actions that end the activation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateAction::SignOutToLanding | GateAction::Navigate(_))
    }
}

/// Advances the machine by one event.
pub fn step(phase: GatePhase, event: GateEvent) -> (GatePhase, GateAction) {
    use GateAction::*;
    use GateEvent::*;
    use GatePhase::*;

    // One-shot guard: after a terminal action, everything is a no-op.
    if phase == Redirected {
        return (Redirected, Stay);
    }

    match event {
        AuthPending => (phase, Stay),
        SessionAbsent => (Idle, Stay),
        SessionUnverified => (Redirected, SignOutToLanding),
        SessionVerified => (Deciding, Stay),
        ProfileFound(record) => (
            Redirected,
            Navigate(destination_for(
                record.role.as_deref(),
                record.onboarding_completed,
            )),
        ),
        ProfileMissing => (Deciding, Bootstrap),
        BootstrapDone => (Redirected, Navigate(Destination::RoleSelection)),
        FetchFailed => (Redirected, Navigate(Destination::Landing)),
        WatchdogFired => (Redirected, Navigate(Destination::Landing)),
    }
}
