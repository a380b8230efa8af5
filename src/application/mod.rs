//! Application layer: the gating components.

mod gate_controller;
mod profile_loader;
mod route_guard;
mod session_store;

pub use gate_controller::GateController;
pub use profile_loader::{ProfileLoader, ProfileSnapshot};
pub use route_guard::{RouteDecision, RouteGuard};
pub use session_store::{SessionSnapshot, SessionStore};
