//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod role;
mod session;
mod timestamp;

pub use errors::StoreError;
pub use ids::UserId;
pub use role::{Role, UnknownRole};
pub use session::{AuthError, Session, UserMetadata};
pub use timestamp::Timestamp;
