//! ProfileStore port for the two-stage onboarding rows.

use async_trait::async_trait;

use crate::domain::foundation::{Role, StoreError, UserId};
use crate::domain::profile::{BrandProfile, CoreProfileRecord, CreatorProfile};

/// Row-store access for core and role-specific profile rows.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from the finders when the row does not exist;
///   absence is a domain fact, not an error
/// - Return `StoreError::UniqueViolation` when `insert_core` collides with
///   an existing row (callers treat this as a successful no-op)
/// - Return `StoreError::PermissionDenied` when the backend's row-level
///   authorization rejects the call
/// - Return `StoreError::Backend` for anything else
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the core profile row for a user.
    async fn find_core(&self, user_id: &UserId) -> Result<Option<CoreProfileRecord>, StoreError>;

    /// Insert a core profile row. The bootstrap path relies on the unique
    /// user-id constraint for concurrency safety.
    async fn insert_core(&self, record: &CoreProfileRecord) -> Result<(), StoreError>;

    /// Set the role on an existing core row. Role selection happens once.
    async fn set_role(&self, user_id: &UserId, role: Role) -> Result<(), StoreError>;

    /// Mark onboarding as completed on an existing core row.
    async fn complete_onboarding(&self, user_id: &UserId) -> Result<(), StoreError>;

    /// Fetch the creator extension row.
    async fn find_creator(&self, user_id: &UserId) -> Result<Option<CreatorProfile>, StoreError>;

    /// Fetch the brand extension row.
    async fn find_brand(&self, user_id: &UserId) -> Result<Option<BrandProfile>, StoreError>;

    /// Insert a creator extension row (onboarding completion).
    async fn insert_creator(&self, profile: &CreatorProfile) -> Result<(), StoreError>;

    /// Insert a brand extension row (onboarding completion).
    async fn insert_brand(&self, profile: &BrandProfile) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_store_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn ProfileStore) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn ProfileStore>>();
    }
}
