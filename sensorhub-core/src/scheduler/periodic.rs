//! Periodic scheduler
//!
//! Each endpoint has one repeating timer slot per sink. The board timer
//! calls [`PeriodicScheduler::poll`] on every tick; expired slots produce a
//! `PeriodicSample` job unless the previous job for the same slot is still
//! in flight.

use portable_atomic::{AtomicU32, Ordering};

use super::job::Job;
use crate::config::{Sink, SinkKind};
use crate::dispatch::Dispatcher;
use crate::error::SchedulerError;
use crate::registry::{EndpointHandle, Registry, SensorEndpoint};

/// Timer side of periodic sampling
pub struct PeriodicScheduler {
    fired: AtomicU32,
    skipped: AtomicU32,
}

impl PeriodicScheduler {
    /// Create a scheduler with zeroed counters
    pub const fn new() -> Self {
        Self {
            fired: AtomicU32::new(0),
            skipped: AtomicU32::new(0),
        }
    }

    /// Arm the slot for `sink`, cancelling any timer already on it
    ///
    /// The first expiry is one period after `now_ms`. A job already in
    /// flight for the slot keeps its pending flag.
    pub fn start(
        &self,
        endpoint: &SensorEndpoint<'_>,
        sink: Sink,
        period_s: u32,
        now_ms: u64,
    ) -> Result<(), SchedulerError> {
        let period_ms = period_ms(period_s)?;
        log::info!(
            "periodic {} -> {} every {}s",
            endpoint.name(),
            sink,
            period_s
        );
        endpoint.arm(sink, period_ms, now_ms);
        Ok(())
    }

    /// Cancel the slot for `kind`; a no-op if nothing is armed
    pub fn stop(&self, endpoint: &SensorEndpoint<'_>, kind: SinkKind) {
        if endpoint.disarm(kind) {
            log::info!("periodic {} -> {} stopped", endpoint.name(), kind);
        }
    }

    /// Fire every slot due at `now_ms`
    ///
    /// Runs in timer context: only flag checks and non-blocking enqueues.
    /// Expiries of `suppressed` are consumed and counted as skipped. Returns
    /// the number of jobs enqueued.
    pub fn poll(
        &self,
        registry: &Registry<'_>,
        dispatcher: &Dispatcher,
        now_ms: u64,
        suppressed: Option<EndpointHandle>,
    ) -> usize {
        let mut enqueued = 0;
        for (handle, endpoint) in registry.iter() {
            for kind in SinkKind::ALL {
                let Some(sink) = endpoint.take_due(kind, now_ms) else {
                    continue;
                };
                if suppressed == Some(handle) {
                    self.skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                if self.fire(handle, endpoint, sink, dispatcher) {
                    enqueued += 1;
                }
            }
        }
        enqueued
    }

    fn fire(
        &self,
        handle: EndpointHandle,
        endpoint: &SensorEndpoint<'_>,
        sink: Sink,
        dispatcher: &Dispatcher,
    ) -> bool {
        let kind = sink.kind();
        if !endpoint.try_claim(kind) {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            log::debug!("{} -> {} still in flight, skipping", endpoint.name(), kind);
            return false;
        }

        match dispatcher.enqueue(Job::PeriodicSample {
            endpoint: handle,
            sink,
        }) {
            Ok(()) => {
                self.fired.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                // Nothing will run to clear the flag
                endpoint.release(kind);
                false
            }
        }
    }

    /// Jobs enqueued so far
    pub fn fired(&self) -> u32 {
        self.fired.load(Ordering::Relaxed)
    }

    /// Expiries skipped because a job was in flight or the endpoint was suppressed
    pub fn skipped(&self) -> u32 {
        self.skipped.load(Ordering::Relaxed)
    }
}

impl Default for PeriodicScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a period in seconds to milliseconds
fn period_ms(period_s: u32) -> Result<u32, SchedulerError> {
    if period_s == 0 {
        return Err(SchedulerError::InvalidPeriod);
    }
    period_s
        .checked_mul(1000)
        .ok_or(SchedulerError::InvalidPeriod)
}
