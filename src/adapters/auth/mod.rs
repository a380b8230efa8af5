//! Auth sub-service adapters.

mod gotrue;
mod mock;

pub use gotrue::{GoTrueConfig, GoTrueGateway};
pub use mock::MockAuthGateway;
