//! Ports: contracts the gating core consumes.
//!
//! All external collaborators (the row store, the auth sub-service, and
//! the navigation surface) are reached only through these traits.

mod auth_gateway;
mod navigator;
mod profile_store;

pub use auth_gateway::{AuthGateway, SessionChange};
pub use navigator::Navigator;
pub use profile_store::ProfileStore;
