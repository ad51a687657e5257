//! Board-agnostic core logic for the sensor board firmware
//!
//! This crate contains all scheduling and dispatch logic that does not
//! depend on specific hardware implementations:
//!
//! - Collaborator traits (device sensors, digital inputs, sinks, motion detector)
//! - Endpoint registry
//! - Periodic scheduler
//! - Deferred work dispatcher (periodic and motion queues)
//! - Motion event state machine
//! - Network rate limiter
//! - Configuration type definitions
//!
//! Three execution contexts share this state: the motion interrupt
//! handler, the timer tick and one worker per queue. Only
//! [`SensorHub::on_timer_tick`] and [`SensorHub::on_motion_interrupt`] may
//! run in interrupt or timer context; neither allocates nor blocks.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod hub;
pub mod limiter;
pub mod motion;
pub mod reading;
pub mod registry;
pub mod scheduler;
pub mod traits;

pub use config::{DispatchConfig, Sink, SinkKind};
pub use dispatch::JobError;
pub use error::SchedulerError;
pub use hub::{HubStats, SensorHub};
pub use motion::{InterruptOutcome, MotionMode, MotionSnapshot, MotionState};
pub use reading::{Reading, ReadingBuilder};
pub use registry::{EndpointHandle, Registry, Schedule, Source};
pub use scheduler::{Job, QueueId};
pub use traits::{Detection, SensorError, SinkError};
