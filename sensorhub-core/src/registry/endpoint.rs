//! Sensor endpoint record
//!
//! Name and source are immutable after registration. The two schedule
//! slots and the pending flags are the only per-endpoint state written at
//! runtime and are shared between the command, timer and worker contexts.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicBool, Ordering};

use crate::config::{EndpointName, Sink, SinkKind};
use crate::reading::Reading;
use crate::traits::{DeviceSensor, DigitalInput, SensorError};

/// What an endpoint samples
#[derive(Clone, Copy)]
pub enum Source<'a> {
    /// Device-backed sensor producing a formatted reading
    Device(&'a dyn DeviceSensor),
    /// GPIO-backed binary input
    Digital(&'a dyn DigitalInput),
}

impl Source<'_> {
    fn is_ready(&self) -> bool {
        match self {
            Source::Device(d) => d.is_ready(),
            Source::Digital(d) => d.is_ready(),
        }
    }
}

/// Periodic schedule of one (endpoint, sink) slot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Schedule {
    /// Destination of periodic jobs
    pub sink: Sink,
    /// Repeat interval
    pub period_ms: u32,
    /// Timestamp of the next expiry
    pub next_due_ms: u64,
    /// False once stopped; the sink is kept for inspection
    pub armed: bool,
}

type Slot = Mutex<CriticalSectionRawMutex, RefCell<Option<Schedule>>>;

/// One registered source and its schedule state
pub struct SensorEndpoint<'a> {
    name: EndpointName,
    source: Source<'a>,
    schedules: [Slot; 2],
    pending: [AtomicBool; 2],
}

impl<'a> SensorEndpoint<'a> {
    pub(crate) fn new(name: EndpointName, source: Source<'a>) -> Self {
        Self {
            name,
            source,
            schedules: [
                Mutex::new(RefCell::new(None)),
                Mutex::new(RefCell::new(None)),
            ],
            pending: [AtomicBool::new(false), AtomicBool::new(false)],
        }
    }

    /// Endpoint name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Sampled source
    pub fn source(&self) -> Source<'a> {
        self.source
    }

    /// Whether the underlying device passed its readiness check
    pub fn is_ready(&self) -> bool {
        self.source.is_ready()
    }

    /// Take one sample and format it
    ///
    /// Blocking device I/O; worker or command context only.
    pub fn sample(&self) -> Result<Reading, SensorError> {
        if !self.source.is_ready() {
            return Err(SensorError::NotReady);
        }
        match self.source {
            Source::Device(device) => device.sample(),
            Source::Digital(input) => Reading::digital(self.name(), input.read_state()?),
        }
    }

    /// Snapshot of a schedule slot
    pub fn schedule(&self, kind: SinkKind) -> Option<Schedule> {
        self.schedules[kind.index()].lock(|slot| slot.borrow().clone())
    }

    /// Arm a slot, replacing whatever was there
    pub(crate) fn arm(&self, sink: Sink, period_ms: u32, now_ms: u64) {
        let kind = sink.kind();
        let schedule = Schedule {
            sink,
            period_ms,
            next_due_ms: now_ms.saturating_add(u64::from(period_ms)),
            armed: true,
        };
        self.schedules[kind.index()].lock(|slot| {
            slot.replace(Some(schedule));
        });
    }

    /// Disarm a slot; returns whether it was armed
    pub(crate) fn disarm(&self, kind: SinkKind) -> bool {
        self.schedules[kind.index()].lock(|slot| match slot.borrow_mut().as_mut() {
            Some(schedule) if schedule.armed => {
                schedule.armed = false;
                true
            }
            _ => false,
        })
    }

    /// Consume an expiry if the slot is due at `now_ms`
    ///
    /// Advances the deadline by one period. A deadline that is still in the
    /// past after advancing is resynchronised to `now_ms`, so a stalled
    /// timer produces one firing rather than a burst.
    pub(crate) fn take_due(&self, kind: SinkKind, now_ms: u64) -> Option<Sink> {
        self.schedules[kind.index()].lock(|slot| {
            let mut slot = slot.borrow_mut();
            let schedule = slot.as_mut().filter(|s| s.armed)?;
            if now_ms < schedule.next_due_ms {
                return None;
            }
            let period = u64::from(schedule.period_ms);
            schedule.next_due_ms = schedule.next_due_ms.saturating_add(period);
            if schedule.next_due_ms <= now_ms {
                schedule.next_due_ms = now_ms.saturating_add(period);
            }
            Some(schedule.sink.clone())
        })
    }

    /// Whether a job for this sink is in flight
    pub fn is_pending(&self, kind: SinkKind) -> bool {
        self.pending[kind.index()].load(Ordering::Acquire)
    }

    /// Set the pending flag; false if it was already set
    pub(crate) fn try_claim(&self, kind: SinkKind) -> bool {
        self.pending[kind.index()]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clear the pending flag
    pub(crate) fn release(&self, kind: SinkKind) {
        self.pending[kind.index()].store(false, Ordering::Release);
    }
}
