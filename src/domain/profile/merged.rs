//! Merged profile view: core fields overlaid with the role extension.

use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::{Role, Timestamp, UserId};

use super::{CoreProfileRecord, RoleProfile};

/// The view the profile loader exposes. Derived projection, never written
/// back as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedProfile {
    pub user_id: UserId,
    pub role: Role,
    pub onboarding_completed: bool,
    pub details: RoleProfile,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The core row and the extension row disagree about the user's role.
#[derive(Debug, Clone, Error)]
#[error("Role profile for {found} does not match core role {expected:?}")]
pub struct RoleMismatch {
    pub expected: Option<Role>,
    pub found: Role,
}

impl MergedProfile {
    /// Overlays the extension row on the core row.
    ///
    /// Fails when the extension's discriminant does not match the core
    /// row's role; that combination must never be shown to a caller.
    pub fn merge(core: &CoreProfileRecord, details: RoleProfile) -> Result<Self, RoleMismatch> {
        let expected = core.parsed_role();
        if expected != Some(details.role()) {
            return Err(RoleMismatch {
                expected,
                found: details.role(),
            });
        }
        Ok(Self {
            user_id: core.user_id,
            role: details.role(),
            onboarding_completed: core.onboarding_completed,
            details,
            created_at: core.created_at,
            updated_at: core.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::CreatorProfile;

    fn core_with_role(role: &str) -> CoreProfileRecord {
        let mut row = CoreProfileRecord::bootstrap(UserId::new());
        row.role = Some(role.to_string());
        row.onboarding_completed = true;
        row
    }

    fn creator_details(user_id: UserId) -> RoleProfile {
        RoleProfile::Creator(CreatorProfile {
            user_id,
            platforms: vec![],
            follower_count: 0,
            niches: vec![],
            bio: None,
            created_at: Timestamp::now(),
        })
    }

    #[test]
    fn merge_succeeds_when_roles_agree() {
        let core = core_with_role("creator");
        let merged = MergedProfile::merge(&core, creator_details(core.user_id)).unwrap();
        assert_eq!(merged.role, Role::Creator);
        assert!(merged.onboarding_completed);
        assert_eq!(merged.user_id, core.user_id);
    }

    #[test]
    fn merge_rejects_mismatched_roles() {
        let core = core_with_role("brand");
        let err = MergedProfile::merge(&core, creator_details(core.user_id)).unwrap_err();
        assert_eq!(err.expected, Some(Role::Brand));
        assert_eq!(err.found, Role::Creator);
    }

    #[test]
    fn merge_rejects_roleless_core() {
        let mut core = core_with_role("creator");
        core.role = None;
        assert!(MergedProfile::merge(&core, creator_details(core.user_id)).is_err());
    }
}
