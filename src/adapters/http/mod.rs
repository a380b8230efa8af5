//! Gating HTTP adapter module.
//!
//! Exposes the gate entry point, the role dashboards, and a health probe
//! over Axum.

pub mod handlers;
pub mod routes;

pub use handlers::GatingAppState;
pub use routes::gating_routes;
