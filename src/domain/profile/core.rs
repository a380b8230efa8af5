//! Core profile row: one per user, the anchor of the gating decision.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, UserId};

/// The minimal per-user record holding role and onboarding status.
///
/// Exactly zero or one row exists per user id; absence means the
/// post-signup bootstrap has never run. `role` is kept as the raw persisted
/// text so that a row written with an out-of-set value still reaches the
/// destination table, which maps it to the fail-safe landing page instead
/// of failing open into a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreProfileRecord {
    /// Primary key; equals the session's user id.
    pub user_id: UserId,

    /// Raw role text, `None` until role selection.
    pub role: Option<String>,

    /// Set true exactly once, when onboarding finishes.
    pub onboarding_completed: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CoreProfileRecord {
    /// The row the gate inserts on first contact: no role, onboarding not
    /// started.
    pub fn bootstrap(user_id: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            role: None,
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The persisted role text parsed against the closed role set.
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// True when role text is present but outside the closed set.
    pub fn has_unrecognized_role(&self) -> bool {
        self.role.is_some() && self.parsed_role().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_row_has_no_role_and_incomplete_onboarding() {
        let row = CoreProfileRecord::bootstrap(UserId::new());
        assert_eq!(row.role, None);
        assert!(!row.onboarding_completed);
        assert_eq!(row.created_at, row.updated_at);
    }

    #[test]
    fn parsed_role_reads_canonical_text() {
        let mut row = CoreProfileRecord::bootstrap(UserId::new());
        row.role = Some("brand".to_string());
        assert_eq!(row.parsed_role(), Some(Role::Brand));
        assert!(!row.has_unrecognized_role());
    }

    #[test]
    fn out_of_set_role_text_is_flagged_not_erased() {
        let mut row = CoreProfileRecord::bootstrap(UserId::new());
        row.role = Some("superadmin".to_string());
        assert_eq!(row.parsed_role(), None);
        assert!(row.has_unrecognized_role());
    }
}
