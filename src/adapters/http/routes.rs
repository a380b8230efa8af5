//! HTTP routes for the gating surface.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{dashboard, gate_entry, health_check, GatingAppState};

/// Creates the gating router with all routes.
pub fn gating_routes(state: GatingAppState) -> Router {
    Router::new()
        // GET /app
        .route("/app", get(gate_entry))
        // GET /dashboard/:role
        .route("/dashboard/:role", get(dashboard))
        // GET /healthz
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
