//! Profile loader: the two-phase merged-profile fetch.
//!
//! `load` never throws past its boundary; every backend outcome is folded
//! into a [`ProfileSnapshot`]:
//!
//! - disabled caller or missing user id: the "don't even try" short-circuit
//! - untrustworthy session (no token, unconfirmed email): same empty state
//! - core row absent: `profile = None` with no onboarding signal; the gate
//!   controller, not this loader, distinguishes "row never created"
//! - role set, extension row absent, onboarding incomplete:
//!   `needs_onboarding = true`
//! - role set, extension row absent, onboarding complete: inconsistent
//!   state, surfaced as an error, never silently defaulted
//! - permission denied: "not ready yet", stop loading silently
//! - deadline exceeded: a distinguishable timeout error

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::foundation::{Role, StoreError, UserId};
use crate::domain::profile::{CoreProfileRecord, MergedProfile, RoleProfile};
use crate::ports::{AuthGateway, ProfileStore};

/// Default deadline for the two-phase fetch.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(3000);

/// What the loader exposes after a load. `load` resolves only once the
/// fetch has settled, so the pending future itself is the loading signal;
/// a snapshot never represents an in-flight state.
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    pub profile: Option<MergedProfile>,
    pub error: Option<StoreError>,
    /// True when the core row exists with a role but onboarding never
    /// finished (no extension row yet).
    pub needs_onboarding: bool,
}

impl ProfileSnapshot {
    /// The empty state used by every short-circuit.
    fn idle() -> Self {
        Self::default()
    }

    fn failed(error: StoreError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Loads and merges the two-stage profile record.
pub struct ProfileLoader {
    store: Arc<dyn ProfileStore>,
    auth: Arc<dyn AuthGateway>,
    timeout: Duration,
}

impl ProfileLoader {
    pub fn new(store: Arc<dyn ProfileStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self {
            store,
            auth,
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Overrides the fetch deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads the merged profile for a user.
    ///
    /// `enabled = false` or a missing user id short-circuits without
    /// touching the auth service or the row store.
    pub async fn load(&self, user_id: Option<&UserId>, enabled: bool) -> ProfileSnapshot {
        let Some(user_id) = user_id else {
            return ProfileSnapshot::idle();
        };
        if !enabled {
            return ProfileSnapshot::idle();
        }

        // Re-derive the authority check against the live session rather
        // than trusting whatever state the caller holds.
        let session = match self.auth.current_session().await {
            Ok(Some(session)) => session,
            Ok(None) => return ProfileSnapshot::idle(),
            Err(error) => {
                debug!(%error, "session unavailable, skipping profile load");
                return ProfileSnapshot::idle();
            }
        };
        if !session.can_read_rows() {
            return ProfileSnapshot::idle();
        }

        match tokio::time::timeout(self.timeout, self.fetch(user_id)).await {
            Ok(snapshot) => snapshot,
            Err(_) => {
                warn!(%user_id, timeout_ms = self.timeout.as_millis() as u64, "profile load timed out");
                ProfileSnapshot::failed(StoreError::Timeout)
            }
        }
    }

    async fn fetch(&self, user_id: &UserId) -> ProfileSnapshot {
        let core = match self.store.find_core(user_id).await {
            Ok(Some(core)) => core,
            // Row never created: the caller must be routed to role
            // selection, which is the gate's call, not ours.
            Ok(None) | Err(StoreError::NotFound) => return ProfileSnapshot::idle(),
            Err(error) if error.is_not_ready() => {
                debug!(%user_id, "row store not ready, stopping quietly");
                return ProfileSnapshot::idle();
            }
            Err(error) => return ProfileSnapshot::failed(error),
        };

        let Some(role) = core.parsed_role() else {
            // No role yet (or text outside the closed set): nothing to
            // merge. The gate's destination table owns what happens next.
            if core.has_unrecognized_role() {
                warn!(user_id = %core.user_id, "core row carries unrecognised role text");
            }
            return ProfileSnapshot::idle();
        };

        let details = match self.fetch_role_profile(user_id, role).await {
            Ok(Some(details)) => details,
            Ok(None) | Err(StoreError::NotFound) => return Self::missing_extension(&core),
            Err(error) if error.is_not_ready() => return ProfileSnapshot::idle(),
            Err(error) => return ProfileSnapshot::failed(error),
        };

        match MergedProfile::merge(&core, details) {
            Ok(profile) => ProfileSnapshot {
                profile: Some(profile),
                ..ProfileSnapshot::idle()
            },
            Err(mismatch) => {
                warn!(%user_id, %mismatch, "role profile does not match core row");
                ProfileSnapshot::failed(StoreError::backend(mismatch.to_string()))
            }
        }
    }

    async fn fetch_role_profile(
        &self,
        user_id: &UserId,
        role: Role,
    ) -> Result<Option<RoleProfile>, StoreError> {
        match role {
            Role::Creator => Ok(self
                .store
                .find_creator(user_id)
                .await?
                .map(RoleProfile::Creator)),
            Role::Brand => Ok(self.store.find_brand(user_id).await?.map(RoleProfile::Brand)),
        }
    }

    /// Role chosen but no extension row.
    fn missing_extension(core: &CoreProfileRecord) -> ProfileSnapshot {
        if core.onboarding_completed {
            // Completed onboarding without an extension row is an
            // inconsistency, not a default.
            warn!(user_id = %core.user_id, "onboarding complete but role profile missing");
            ProfileSnapshot::failed(StoreError::backend(
                "role profile missing for completed onboarding",
            ))
        } else {
            ProfileSnapshot {
                needs_onboarding: true,
                ..ProfileSnapshot::idle()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockAuthGateway;
    use crate::adapters::profile::InMemoryProfileStore;
    use crate::domain::foundation::{Session, Timestamp};
    use crate::domain::profile::CreatorProfile;

    fn verified_session(user_id: UserId) -> Session {
        Session::new(user_id, "test@example.com", Some(Timestamp::now()), "tok")
    }

    fn core(user_id: UserId, role: Option<&str>, completed: bool) -> CoreProfileRecord {
        let mut record = CoreProfileRecord::bootstrap(user_id);
        record.role = role.map(String::from);
        record.onboarding_completed = completed;
        record
    }

    fn creator_row(user_id: UserId) -> CreatorProfile {
        CreatorProfile {
            user_id,
            platforms: vec!["youtube".to_string()],
            follower_count: 5_000,
            niches: vec![],
            bio: None,
            created_at: Timestamp::now(),
        }
    }

    fn loader(store: Arc<InMemoryProfileStore>, auth: Arc<MockAuthGateway>) -> ProfileLoader {
        ProfileLoader::new(store, auth)
    }

    fn idle(snapshot: &ProfileSnapshot) -> bool {
        snapshot.profile.is_none() && snapshot.error.is_none() && !snapshot.needs_onboarding
    }

    #[tokio::test]
    async fn disabled_load_short_circuits() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(InMemoryProfileStore::new());
        let snapshot = loader(store, auth).load(Some(&user_id), false).await;
        assert!(idle(&snapshot));
    }

    #[tokio::test]
    async fn missing_user_id_short_circuits() {
        let auth = Arc::new(MockAuthGateway::new());
        let store = Arc::new(InMemoryProfileStore::new());
        let snapshot = loader(store, auth).load(None, true).await;
        assert!(idle(&snapshot));
    }

    #[tokio::test]
    async fn unverified_session_never_touches_the_store() {
        let user_id = UserId::new();
        let session = Session::new(user_id, "new@example.com", None, "tok");
        let auth = Arc::new(MockAuthGateway::new().with_session(session));
        let store = Arc::new(
            InMemoryProfileStore::new().with_core(core(user_id, Some("creator"), true)),
        );

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        assert!(idle(&snapshot));
    }

    #[tokio::test]
    async fn missing_core_row_is_not_an_error() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(InMemoryProfileStore::new());

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        assert!(idle(&snapshot));
    }

    #[tokio::test]
    async fn role_without_extension_row_needs_onboarding() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(
            InMemoryProfileStore::new().with_core(core(user_id, Some("creator"), false)),
        );

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        assert!(snapshot.needs_onboarding);
        assert!(snapshot.profile.is_none());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn completed_onboarding_without_extension_row_is_an_error() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(
            InMemoryProfileStore::new().with_core(core(user_id, Some("creator"), true)),
        );

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        assert!(snapshot.error.is_some());
        assert!(snapshot.profile.is_none());
        assert!(!snapshot.needs_onboarding);
    }

    #[tokio::test]
    async fn full_profile_merges() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(
            InMemoryProfileStore::new()
                .with_core(core(user_id, Some("creator"), true))
                .with_creator(creator_row(user_id)),
        );

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        let profile = snapshot.profile.expect("merged profile");
        assert_eq!(profile.role, Role::Creator);
        assert!(profile.onboarding_completed);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn permission_denied_is_silent() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(
            InMemoryProfileStore::new().with_core(core(user_id, Some("creator"), true)),
        );
        store.set_permission_denied(true);

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        assert!(idle(&snapshot));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_store_surfaces_a_timeout_error() {
        let user_id = UserId::new();
        let auth = Arc::new(MockAuthGateway::new().with_session(verified_session(user_id)));
        let store = Arc::new(InMemoryProfileStore::new());
        store.set_hang_reads(true);

        let snapshot = loader(store, auth).load(Some(&user_id), true).await;

        let error = snapshot.error.expect("timeout error");
        assert!(matches!(error, StoreError::Timeout));
        assert_eq!(error.to_string(), "Timeout loading profile");
    }
}
