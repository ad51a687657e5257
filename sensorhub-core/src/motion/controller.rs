//! Motion controller
//!
//! Owns the published motion snapshot. Commands replace the whole snapshot
//! inside a critical section; the interrupt pathway copies it out under the
//! same lock, so it always sees one complete (mode, action) pair.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicU32, Ordering};

use super::machine::{MotionCommand, MotionSnapshot, MotionState};
use crate::config::{Sink, SinkKind};
use crate::dispatch::Dispatcher;
use crate::error::SchedulerError;
use crate::limiter::RateLimiter;
use crate::registry::EndpointHandle;
use crate::scheduler::Job;
use crate::traits::{Detection, MotionDetector};

/// What the interrupt pathway did with one interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptOutcome {
    /// Motion is disabled
    Ignored,
    /// A motion job was queued
    Enqueued,
    /// Network action suppressed by the rate limiter
    RateLimited,
    /// Motion queue was full
    Dropped,
}

/// Motion state machine plus the detector it programs
pub struct MotionController<'a> {
    detector: &'a dyn MotionDetector,
    snapshot: Mutex<CriticalSectionRawMutex, RefCell<MotionSnapshot>>,
    enqueued: AtomicU32,
    ignored: AtomicU32,
    rate_limited: AtomicU32,
}

impl<'a> MotionController<'a> {
    /// Create a controller in the Disabled state
    pub fn new(detector: &'a dyn MotionDetector) -> Self {
        Self {
            detector,
            snapshot: Mutex::new(RefCell::new(MotionSnapshot::initial())),
            enqueued: AtomicU32::new(0),
            ignored: AtomicU32::new(0),
            rate_limited: AtomicU32::new(0),
        }
    }

    /// The detector behind the interrupt line
    pub fn detector(&self) -> &'a dyn MotionDetector {
        self.detector
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> MotionSnapshot {
        self.snapshot.lock(|s| s.borrow().clone())
    }

    /// Check if interrupts currently produce jobs
    ///
    /// Reads the state in place; nothing is copied out of the lock.
    pub fn is_armed(&self) -> bool {
        self.snapshot.lock(|s| s.borrow().state.is_armed())
    }

    /// Arm `detection` with `action`
    ///
    /// Interrupts are ignored while the detector is reprogrammed. If arming
    /// fails the machine is left Disabled.
    pub fn start(&self, detection: Detection, action: Sink) -> Result<(), SchedulerError> {
        self.apply(MotionCommand::Stop);
        if let Err(e) = self.detector.arm(detection) {
            log::warn!("motion: arming {} failed: {}", detection, e);
            return Err(e.into());
        }
        log::info!("motion: {} -> {}", detection, action);
        self.apply(MotionCommand::Start { detection, action });
        Ok(())
    }

    /// Disarm; calling it while disabled is a no-op
    pub fn stop(&self) -> Result<(), SchedulerError> {
        let was_armed = self.is_armed();
        self.apply(MotionCommand::Stop);
        if !was_armed {
            return Ok(());
        }
        log::info!("motion: disabled");
        self.detector.disarm()?;
        Ok(())
    }

    /// Publish the state produced by `command`
    fn apply(&self, command: MotionCommand) -> MotionSnapshot {
        self.snapshot.lock(|cell| {
            let mut s = cell.borrow_mut();
            let state = core::mem::replace(&mut s.state, MotionState::Disabled);
            s.state = state.transition(command);
            s.generation = s.generation.wrapping_add(1);
            s.clone()
        })
    }

    /// Handle one hardware interrupt
    ///
    /// Interrupt context: reads the snapshot and enqueues, nothing else.
    pub fn on_interrupt(
        &self,
        endpoint: EndpointHandle,
        now_ms: u64,
        limiter: &RateLimiter,
        dispatcher: &Dispatcher,
    ) -> InterruptOutcome {
        let snapshot = self.snapshot();
        let MotionState::Armed { detection, action } = snapshot.state else {
            self.ignored.fetch_add(1, Ordering::Relaxed);
            return InterruptOutcome::Ignored;
        };

        if action.kind() == SinkKind::Network && !limiter.try_acquire(now_ms) {
            self.rate_limited.fetch_add(1, Ordering::Relaxed);
            return InterruptOutcome::RateLimited;
        }

        let job = Job::MotionEvent {
            endpoint,
            detection,
            action,
            generation: snapshot.generation,
        };
        match dispatcher.enqueue(job) {
            Ok(()) => {
                self.enqueued.fetch_add(1, Ordering::Relaxed);
                InterruptOutcome::Enqueued
            }
            Err(_) => InterruptOutcome::Dropped,
        }
    }

    /// Interrupts turned into jobs
    pub fn enqueued(&self) -> u32 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Interrupts seen while disabled
    pub fn ignored(&self) -> u32 {
        self.ignored.load(Ordering::Relaxed)
    }

    /// Interrupts suppressed by the rate limiter
    pub fn rate_limited(&self) -> u32 {
        self.rate_limited.load(Ordering::Relaxed)
    }
}
