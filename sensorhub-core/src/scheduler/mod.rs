//! Periodic scheduling and the job model
//!
//! Timer expiries are turned into jobs here; the jobs themselves are
//! executed by the dispatcher's workers.

pub mod job;
pub mod periodic;

pub use job::{Job, QueueId};
pub use periodic::PeriodicScheduler;
