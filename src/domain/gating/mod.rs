//! Gating domain: destination table and the gate state machine.

mod destination;
pub mod machine;

pub use destination::{destination_for, Destination};
pub use machine::{GateAction, GateEvent, GatePhase};
