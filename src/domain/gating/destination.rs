//! The single routing authority: one table from profile state to screen.
//!
//! Every component that redirects (gate controller, route guards, session
//! store sign-out) goes through `Destination`; no caller builds a path by
//! hand or compares role strings.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::Role;

/// Where a gating decision sends the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Public landing page, also the fail-safe for every error path.
    Landing,

    /// Login screen, for unauthenticated visitors to protected pages.
    Login,

    /// The gate controller entry point. Route guards send anything
    /// unresolved here so the gate stays the only place that decides
    /// where a role goes.
    GateEntry,

    /// Role selection, for users whose core profile has no role yet.
    RoleSelection,

    /// Role-specific onboarding flow.
    Onboarding(Role),

    /// Role-specific dashboard, a stable terminal destination.
    Dashboard(Role),
}

impl Destination {
    /// URL path for this destination.
    pub fn path(&self) -> String {
        match self {
            Destination::Landing => "/".to_string(),
            Destination::Login => "/login".to_string(),
            Destination::GateEntry => "/app".to_string(),
            Destination::RoleSelection => "/role".to_string(),
            Destination::Onboarding(role) => format!("/onboarding/{role}"),
            Destination::Dashboard(role) => format!("/dashboard/{role}"),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// The destination table for a core profile row.
///
/// `role_text` is the raw persisted column value. Text outside the closed
/// role set maps to the landing page for either onboarding state: a row we
/// cannot classify must never fail open into a dashboard or produce an
/// onboarding path for a role the enum cannot represent.
pub fn destination_for(role_text: Option<&str>, onboarding_completed: bool) -> Destination {
    match role_text {
        None => Destination::RoleSelection,
        Some(text) => match Role::parse(text) {
            Some(role) if onboarding_completed => Destination::Dashboard(role),
            Some(role) => Destination::Onboarding(role),
            None => Destination::Landing,
        },
    }
}
