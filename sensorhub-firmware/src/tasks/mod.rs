//! Embassy tasks
//!
//! - `tick_task`: board timer driving periodic schedules
//! - `worker_task`: executes jobs from one queue into the sinks
//! - `motion_source_task`: simulated wearer raising motion interrupts

pub mod motion;
pub mod tick;
pub mod worker;

pub use motion::motion_source_task;
pub use tick::tick_task;
pub use worker::worker_task;
