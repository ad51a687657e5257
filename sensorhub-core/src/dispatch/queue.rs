//! Bounded job queues
//!
//! Two separate channels so that a burst of motion interrupts and periodic
//! telemetry cannot starve each other. Enqueue never blocks or allocates:
//! a full queue drops the job and bumps a counter.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use portable_atomic::{AtomicU32, Ordering};

use crate::config::{MOTION_QUEUE_DEPTH, PERIODIC_QUEUE_DEPTH};
use crate::scheduler::{Job, QueueId};

/// Returned when a queue had no room; the job has been dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub QueueId);

/// Periodic and motion job queues
pub struct Dispatcher {
    periodic: Channel<CriticalSectionRawMutex, Job, PERIODIC_QUEUE_DEPTH>,
    motion: Channel<CriticalSectionRawMutex, Job, MOTION_QUEUE_DEPTH>,
    dropped: [AtomicU32; 2],
}

impl Dispatcher {
    /// Create empty queues
    pub const fn new() -> Self {
        Self {
            periodic: Channel::new(),
            motion: Channel::new(),
            dropped: [AtomicU32::new(0), AtomicU32::new(0)],
        }
    }

    /// Route a job to its queue
    ///
    /// Safe from interrupt and timer context.
    pub fn enqueue(&self, job: Job) -> Result<(), QueueFull> {
        let queue = job.queue();
        let result = match queue {
            QueueId::Periodic => self.periodic.try_send(job),
            QueueId::Motion => self.motion.try_send(job),
        };
        match result {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped[queue.index()].fetch_add(1, Ordering::Relaxed);
                Err(QueueFull(queue))
            }
        }
    }

    /// Take the oldest job of a queue without waiting
    pub fn try_next(&self, queue: QueueId) -> Option<Job> {
        match queue {
            QueueId::Periodic => self.periodic.try_receive().ok(),
            QueueId::Motion => self.motion.try_receive().ok(),
        }
    }

    /// Wait for the oldest job of a queue
    pub async fn next(&self, queue: QueueId) -> Job {
        match queue {
            QueueId::Periodic => self.periodic.receive().await,
            QueueId::Motion => self.motion.receive().await,
        }
    }

    /// Jobs currently waiting in a queue
    pub fn len(&self, queue: QueueId) -> usize {
        match queue {
            QueueId::Periodic => self.periodic.len(),
            QueueId::Motion => self.motion.len(),
        }
    }

    /// Jobs dropped because a queue was full
    pub fn dropped(&self, queue: QueueId) -> u32 {
        self.dropped[queue.index()].load(Ordering::Relaxed)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Sink;
    use crate::registry::EndpointHandle;
    use crate::traits::Detection;

    fn motion_job(generation: u32, handle: EndpointHandle) -> Job {
        Job::MotionEvent {
            endpoint: handle,
            detection: Detection::Tap,
            action: Sink::file("tap.log").unwrap(),
            generation,
        }
    }

    fn handle() -> EndpointHandle {
        use crate::registry::{Registry, Source};
        use crate::traits::{DigitalInput, SensorError};

        struct Line;
        impl DigitalInput for Line {
            fn read_state(&self) -> Result<bool, SensorError> {
                Ok(false)
            }
        }
        static LINE: Line = Line;

        let mut reg = Registry::new();
        reg.register("imu", Source::Digital(&LINE)).unwrap()
    }

    #[test]
    fn test_fifo_per_queue() {
        let d = Dispatcher::new();
        let h = handle();
        d.enqueue(motion_job(1, h)).unwrap();
        d.enqueue(motion_job(2, h)).unwrap();
        d.enqueue(Job::PeriodicSample {
            endpoint: h,
            sink: Sink::file("p.log").unwrap(),
        })
        .unwrap();

        assert_eq!(d.len(QueueId::Motion), 2);
        assert_eq!(d.len(QueueId::Periodic), 1);
        assert_eq!(d.try_next(QueueId::Motion), Some(motion_job(1, h)));
        assert_eq!(d.try_next(QueueId::Motion), Some(motion_job(2, h)));
        assert_eq!(d.try_next(QueueId::Motion), None);
        assert!(d.try_next(QueueId::Periodic).is_some());
    }

    #[test]
    fn test_full_queue_drops() {
        let d = Dispatcher::new();
        let h = handle();
        for i in 0..MOTION_QUEUE_DEPTH as u32 {
            d.enqueue(motion_job(i, h)).unwrap();
        }
        assert_eq!(
            d.enqueue(motion_job(99, h)),
            Err(QueueFull(QueueId::Motion))
        );
        assert_eq!(d.dropped(QueueId::Motion), 1);
        assert_eq!(d.dropped(QueueId::Periodic), 0);
    }
}
