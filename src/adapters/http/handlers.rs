//! HTTP handlers for the gating surface.
//!
//! Each gate entry request runs one fresh `GateController` activation
//! against a recording navigator and converts the single recorded decision
//! into a redirect. Dashboards go through the route guard and either render
//! or bounce back to `/login` or `/app`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde_json::json;

use crate::adapters::navigation::RecordingNavigator;
use crate::application::{GateController, ProfileLoader, RouteDecision, RouteGuard, SessionStore};
use crate::domain::foundation::Role;
use crate::domain::gating::Destination;
use crate::ports::{AuthGateway, Navigator, ProfileStore};

/// Shared state for the gating routes.
#[derive(Clone)]
pub struct GatingAppState {
    pub store: Arc<dyn ProfileStore>,
    pub auth: Arc<dyn AuthGateway>,
    pub sessions: Arc<SessionStore>,
    pub loader: Arc<ProfileLoader>,

    /// Watchdog deadline for one gate activation.
    pub decision_timeout: Duration,
}

/// GET /healthz
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /app
///
/// The gate entry point. Activates the controller once and redirects to
/// whatever it decided; a visitor without a usable session goes to login.
pub async fn gate_entry(State(state): State<GatingAppState>) -> Response {
    let sink = Arc::new(RecordingNavigator::new());
    let controller = GateController::new(
        Arc::clone(&state.store),
        Arc::clone(&state.auth),
        Arc::clone(&sink) as Arc<dyn Navigator>,
    )
    .with_timeout(state.decision_timeout);

    controller.activate().await;

    match sink.last() {
        Some((destination, _)) => Redirect::to(&destination.path()).into_response(),
        // No decision means no session (or auth still settling). The gate
        // never redirects those itself; the route does.
        None => Redirect::to(&Destination::Login.path()).into_response(),
    }
}

/// GET /dashboard/:role
///
/// Terminal destination. Admission is checked once here; nothing inside
/// the dashboard redirects again.
pub async fn dashboard(
    Path(role): Path<String>,
    State(state): State<GatingAppState>,
) -> Response {
    let Ok(role) = role.parse::<Role>() else {
        // A path outside the closed role set is not an error page, the
        // gate re-resolves it.
        return Redirect::to(&Destination::GateEntry.path()).into_response();
    };

    let guard = RouteGuard::new(Arc::clone(&state.sessions), Arc::clone(&state.loader));
    match guard.admit_dashboard(role).await {
        RouteDecision::Allow => Json(json!({ "dashboard": role.as_str() })).into_response(),
        decision => {
            let destination = decision
                .redirect_destination()
                .unwrap_or(Destination::Login);
            Redirect::to(&destination.path()).into_response()
        }
    }
}
