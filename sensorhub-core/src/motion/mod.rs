//! Motion event state machine
//!
//! Governs the designated motion endpoint's exclusive detection mode and
//! turns hardware interrupts into motion jobs.

pub mod controller;
pub mod machine;

pub use controller::{InterruptOutcome, MotionController};
pub use machine::{MotionCommand, MotionMode, MotionSnapshot, MotionState};
