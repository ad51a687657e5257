//! Deferred work dispatcher
//!
//! Producers (timer tick, motion interrupt) push jobs into bounded queues;
//! one worker per queue pops and executes them serially.

pub mod queue;
pub mod worker;

pub use queue::{Dispatcher, QueueFull};
pub use worker::{execute, JobError};
