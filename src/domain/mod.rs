//! Domain layer: value objects, profile aggregates, and the gate machine.

pub mod foundation;
pub mod gating;
pub mod profile;
