//! Route guards for protected pages and dashboards.
//!
//! Guards only ever allow rendering or bounce the visitor to `/login` or to
//! the gate entry point. They never pick a dashboard themselves; the gate
//! controller is the single place that resolves where a role goes. A
//! dashboard admitted here is terminal: nothing inside it re-checks auth
//! state or redirects.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::Role;
use crate::domain::gating::Destination;

use super::{ProfileLoader, SessionStore};

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the protected page.
    Allow,

    /// No session: go sign in.
    RedirectLogin,

    /// Session exists but profile state is unresolved or mismatched: let
    /// the gate decide.
    RedirectGate,
}

impl RouteDecision {
    /// The redirect target, if this decision is not `Allow`.
    pub fn redirect_destination(&self) -> Option<Destination> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::RedirectLogin => Some(Destination::Login),
            RouteDecision::RedirectGate => Some(Destination::GateEntry),
        }
    }
}

/// Lightweight per-route authorization over the session store and profile
/// loader.
pub struct RouteGuard {
    sessions: Arc<SessionStore>,
    loader: Arc<ProfileLoader>,
}

impl RouteGuard {
    pub fn new(sessions: Arc<SessionStore>, loader: Arc<ProfileLoader>) -> Self {
        Self { sessions, loader }
    }

    /// Guard for a simple authenticated page.
    pub fn admit_page(&self) -> RouteDecision {
        let snapshot = self.sessions.snapshot();
        if snapshot.loading {
            // Treat as unauthenticated until auth settles; the login page
            // bounces signed-in users back.
            return RouteDecision::RedirectLogin;
        }
        match snapshot.session {
            Some(session) if session.is_verified() => RouteDecision::Allow,
            _ => RouteDecision::RedirectLogin,
        }
    }

    /// Guard for a role-specific dashboard. `requested` is the role named
    /// in the URL path.
    pub async fn admit_dashboard(&self, requested: Role) -> RouteDecision {
        let snapshot = self.sessions.snapshot();
        let session = match snapshot.session {
            Some(session) if !snapshot.loading => session,
            _ => return RouteDecision::RedirectLogin,
        };
        if !session.is_verified() {
            return RouteDecision::RedirectLogin;
        }

        let profile = self
            .loader
            .load(Some(&session.user_id), true)
            .await;

        match profile.profile {
            Some(profile) if profile.role == requested && profile.onboarding_completed => {
                RouteDecision::Allow
            }
            Some(profile) => {
                // Mismatched role in the URL, or onboarding incomplete:
                // back to the single state machine, never an error page.
                debug!(requested = %requested, actual = %profile.role, "dashboard role mismatch");
                RouteDecision::RedirectGate
            }
            None => RouteDecision::RedirectGate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockAuthGateway;
    use crate::adapters::navigation::RecordingNavigator;
    use crate::adapters::profile::InMemoryProfileStore;
    use crate::domain::foundation::{Session, Timestamp, UserId};
    use crate::domain::profile::{CoreProfileRecord, CreatorProfile};
    use crate::ports::{AuthGateway, Navigator, ProfileStore};

    fn verified_session(user_id: UserId) -> Session {
        Session::new(user_id, "user@example.com", Some(Timestamp::now()), "tok")
    }

    async fn guard_with(
        auth: MockAuthGateway,
        store: InMemoryProfileStore,
    ) -> RouteGuard {
        let auth: Arc<dyn AuthGateway> = Arc::new(auth);
        let navigator: Arc<dyn Navigator> = Arc::new(RecordingNavigator::new());
        let sessions = Arc::new(SessionStore::new(Arc::clone(&auth), navigator));
        sessions.start().await;
        let loader = Arc::new(ProfileLoader::new(
            Arc::new(store) as Arc<dyn ProfileStore>,
            auth,
        ));
        RouteGuard::new(sessions, loader)
    }

    fn completed_creator(user_id: UserId) -> InMemoryProfileStore {
        let mut core = CoreProfileRecord::bootstrap(user_id);
        core.role = Some("creator".to_string());
        core.onboarding_completed = true;
        InMemoryProfileStore::new().with_core(core).with_creator(CreatorProfile {
            user_id,
            platforms: vec![],
            follower_count: 0,
            niches: vec![],
            bio: None,
            created_at: Timestamp::now(),
        })
    }

    #[tokio::test]
    async fn page_without_session_redirects_to_login() {
        let guard = guard_with(MockAuthGateway::new(), InMemoryProfileStore::new()).await;
        assert_eq!(guard.admit_page(), RouteDecision::RedirectLogin);
    }

    #[tokio::test]
    async fn page_with_verified_session_is_allowed() {
        let guard = guard_with(
            MockAuthGateway::new().with_session(verified_session(UserId::new())),
            InMemoryProfileStore::new(),
        )
        .await;
        assert_eq!(guard.admit_page(), RouteDecision::Allow);
    }

    #[tokio::test]
    async fn page_with_unverified_session_redirects_to_login() {
        let session = Session::new(UserId::new(), "new@example.com", None, "tok");
        let guard = guard_with(
            MockAuthGateway::new().with_session(session),
            InMemoryProfileStore::new(),
        )
        .await;
        assert_eq!(guard.admit_page(), RouteDecision::RedirectLogin);
    }

    #[tokio::test]
    async fn matching_completed_dashboard_is_allowed() {
        let user_id = UserId::new();
        let guard = guard_with(
            MockAuthGateway::new().with_session(verified_session(user_id)),
            completed_creator(user_id),
        )
        .await;

        assert_eq!(
            guard.admit_dashboard(Role::Creator).await,
            RouteDecision::Allow
        );
    }

    #[tokio::test]
    async fn mismatched_role_redirects_to_the_gate_not_an_error() {
        let user_id = UserId::new();
        let guard = guard_with(
            MockAuthGateway::new().with_session(verified_session(user_id)),
            completed_creator(user_id),
        )
        .await;

        let decision = guard.admit_dashboard(Role::Brand).await;
        assert_eq!(decision, RouteDecision::RedirectGate);
        assert_eq!(
            decision.redirect_destination(),
            Some(Destination::GateEntry)
        );
    }

    #[tokio::test]
    async fn missing_profile_redirects_to_the_gate() {
        let user_id = UserId::new();
        let guard = guard_with(
            MockAuthGateway::new().with_session(verified_session(user_id)),
            InMemoryProfileStore::new(),
        )
        .await;

        assert_eq!(
            guard.admit_dashboard(Role::Creator).await,
            RouteDecision::RedirectGate
        );
    }

    #[tokio::test]
    async fn dashboard_without_session_redirects_to_login() {
        let guard = guard_with(MockAuthGateway::new(), InMemoryProfileStore::new()).await;
        assert_eq!(
            guard.admit_dashboard(Role::Creator).await,
            RouteDecision::RedirectLogin
        );
    }
}
