//! Persistence error taxonomy for the gating subsystem.
//!
//! The row store distinguishes four classes of failure, and the gating
//! components react to each differently:
//!
//! - **not found**: expected absence, drives a transition (bootstrap or
//!   "needs onboarding"), never surfaced as failure text
//! - **permission denied**: the access token has not yet propagated to the
//!   backend's row-level authorization; treated as "not ready", silently
//!   stop loading
//! - **timeout**: surfaced distinctly so the UI is never stuck on a spinner
//! - anything else: fatal, the caller fails safe to the landing page

use thiserror::Error;

/// Errors returned by the profile row store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested row does not exist.
    #[error("Row not found")]
    NotFound,

    /// An insert collided with an existing row on a unique constraint.
    /// The bootstrap path treats this as a successful no-op.
    #[error("Unique constraint violation")]
    UniqueViolation,

    /// The backend's authorization check rejected the read, typically
    /// because a fresh access token has not propagated yet.
    #[error("Permission denied by row store")]
    PermissionDenied,

    /// The round-trip exceeded the configured deadline.
    #[error("Timeout loading profile")]
    Timeout,

    /// Any other backend failure.
    #[error("Row store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a backend error with a message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Returns true for the "not ready yet" class: stop loading silently,
    /// no user-visible error, no navigation.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, StoreError::PermissionDenied)
    }
}
