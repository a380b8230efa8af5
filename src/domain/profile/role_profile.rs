//! Role-specific extension rows, created only after onboarding completes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, UserId};

/// Creator-side extension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub user_id: UserId,

    /// Platforms the creator publishes on ("youtube", "tiktok", ...).
    pub platforms: Vec<String>,

    /// Combined follower count across platforms.
    pub follower_count: i64,

    /// Content niches ("fitness", "gaming", ...).
    pub niches: Vec<String>,

    pub bio: Option<String>,

    pub created_at: Timestamp,
}

/// Brand-side extension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub user_id: UserId,

    pub company_name: String,

    pub industry: Option<String>,

    /// Headcount bracket ("1-10", "11-50", ...).
    pub company_size: Option<String>,

    /// Monthly campaign budget in cents.
    pub monthly_budget_cents: Option<i64>,

    pub website: Option<String>,

    pub created_at: Timestamp,
}

/// Either extension row, discriminated by role.
///
/// Invariant: a `RoleProfile` for role X may only be read or written while
/// `CoreProfileRecord.role == X`; the merge step enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Creator(CreatorProfile),
    Brand(BrandProfile),
}

impl RoleProfile {
    /// The role this extension row belongs to.
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Creator(_) => Role::Creator,
            RoleProfile::Brand(_) => Role::Brand,
        }
    }

    /// The owning user id.
    pub fn user_id(&self) -> &UserId {
        match self {
            RoleProfile::Creator(p) => &p.user_id,
            RoleProfile::Brand(p) => &p.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator_profile(user_id: UserId) -> CreatorProfile {
        CreatorProfile {
            user_id,
            platforms: vec!["youtube".to_string()],
            follower_count: 12_000,
            niches: vec!["fitness".to_string()],
            bio: None,
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn role_profile_reports_its_discriminant() {
        let user_id = UserId::new();
        let creator = RoleProfile::Creator(creator_profile(user_id));
        assert_eq!(creator.role(), Role::Creator);
        assert_eq!(creator.user_id(), &user_id);
    }

    #[test]
    fn role_profile_serde_tags_with_role() {
        let creator = RoleProfile::Creator(creator_profile(UserId::new()));
        let json = serde_json::to_value(&creator).unwrap();
        assert_eq!(json["role"], "creator");
    }
}
