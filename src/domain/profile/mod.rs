//! Profile aggregates: the two-stage onboarding record.
//!
//! `CoreProfileRecord` is the minimal per-user row (role + onboarding flag),
//! created idempotently by the gate the first time it sees a verified
//! session with no row. The role-specific extension rows
//! (`CreatorProfile`/`BrandProfile`) exist only after onboarding completes.
//! `MergedProfile` is the derived, view-only overlay of both.

mod core;
mod merged;
mod role_profile;

pub use self::core::CoreProfileRecord;
pub use merged::{MergedProfile, RoleMismatch};
pub use role_profile::{BrandProfile, CreatorProfile, RoleProfile};
