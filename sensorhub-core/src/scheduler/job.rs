//! Deferred work items
//!
//! Jobs carry a copy of their destination, so a schedule or motion change
//! after enqueue never alters a job already in a queue.

use crate::config::{Sink, SinkKind};
use crate::registry::EndpointHandle;
use crate::traits::Detection;

/// Queue a job is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueId {
    /// Periodic sample jobs, both sinks
    Periodic,
    /// Motion event jobs
    Motion,
}

impl QueueId {
    /// Both queues
    pub const ALL: [QueueId; 2] = [QueueId::Periodic, QueueId::Motion];

    /// Slot index used for per-queue tables
    pub const fn index(self) -> usize {
        match self {
            QueueId::Periodic => 0,
            QueueId::Motion => 1,
        }
    }

    /// Lowercase name for logs
    pub const fn as_str(self) -> &'static str {
        match self {
            QueueId::Periodic => "periodic",
            QueueId::Motion => "motion",
        }
    }
}

/// One unit of deferred work, executed once and discarded
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Job {
    /// Sample an endpoint and write it to a sink
    PeriodicSample {
        /// Sampled endpoint
        endpoint: EndpointHandle,
        /// Destination at the time of firing
        sink: Sink,
    },
    /// Record one motion interrupt
    MotionEvent {
        /// The designated motion endpoint
        endpoint: EndpointHandle,
        /// Detection that was armed when the interrupt fired
        detection: Detection,
        /// Action that was armed when the interrupt fired
        action: Sink,
        /// Generation of the motion snapshot the pair was read from
        generation: u32,
    },
}

impl Job {
    /// Queue this job belongs to
    pub fn queue(&self) -> QueueId {
        match self {
            Job::PeriodicSample { .. } => QueueId::Periodic,
            Job::MotionEvent { .. } => QueueId::Motion,
        }
    }

    /// Endpoint the job samples
    pub fn endpoint(&self) -> EndpointHandle {
        match self {
            Job::PeriodicSample { endpoint, .. } | Job::MotionEvent { endpoint, .. } => *endpoint,
        }
    }

    /// Destination the job writes to
    pub fn sink(&self) -> &Sink {
        match self {
            Job::PeriodicSample { sink, .. } => sink,
            Job::MotionEvent { action, .. } => action,
        }
    }

    /// Kind of the destination
    pub fn sink_kind(&self) -> SinkKind {
        self.sink().kind()
    }
}
