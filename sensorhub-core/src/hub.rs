//! Sensor hub
//!
//! The command-facing facade. Owns the registry, the periodic scheduler,
//! both job queues, the motion controller and the rate limiter, and exposes
//! the operations used by the command layer, the board timer, the motion
//! interrupt and the workers. Every method takes `&self`, so a single hub
//! can be shared by all contexts.

use portable_atomic::{AtomicU32, Ordering};

use crate::config::{DispatchConfig, Sink, SinkKind};
use crate::dispatch::{self, Dispatcher, JobError};
use crate::error::SchedulerError;
use crate::limiter::RateLimiter;
use crate::motion::{InterruptOutcome, MotionController, MotionSnapshot};
use crate::reading::Reading;
use crate::registry::{EndpointHandle, Registry, Schedule, SensorEndpoint};
use crate::scheduler::{Job, PeriodicScheduler, QueueId};
use crate::traits::{Detection, FileSink, MotionDetector, NetworkSink, SensorError};

/// Dispatch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HubStats {
    /// Periodic jobs enqueued
    pub periodic_fired: u32,
    /// Periodic expiries skipped (job in flight or motion armed)
    pub periodic_skipped: u32,
    /// Periodic jobs dropped on a full queue
    pub periodic_dropped: u32,
    /// Motion jobs enqueued
    pub motion_enqueued: u32,
    /// Interrupts while motion was disabled
    pub motion_ignored: u32,
    /// Motion network jobs suppressed by the rate limiter
    pub motion_rate_limited: u32,
    /// Motion jobs dropped on a full queue
    pub motion_dropped: u32,
    /// Jobs that wrote a record
    pub jobs_completed: u32,
    /// Jobs that failed and were discarded
    pub jobs_failed: u32,
}

/// Scheduling and dispatch core for one board
pub struct SensorHub<'a> {
    registry: Registry<'a>,
    scheduler: PeriodicScheduler,
    dispatcher: Dispatcher,
    motion: MotionController<'a>,
    motion_endpoint: EndpointHandle,
    limiter: RateLimiter,
    config: DispatchConfig,
    completed: AtomicU32,
    failed: AtomicU32,
}

impl<'a> SensorHub<'a> {
    /// Build a hub from a populated registry
    ///
    /// `motion_endpoint` names the endpoint sampled for motion events;
    /// `detector` is the device behind the motion interrupt line.
    pub fn new(
        registry: Registry<'a>,
        motion_endpoint: &str,
        detector: &'a dyn MotionDetector,
        config: DispatchConfig,
    ) -> Result<Self, SchedulerError> {
        let motion_endpoint = registry
            .lookup(motion_endpoint)
            .ok_or(SchedulerError::UnknownSensor)?;
        Ok(Self {
            registry,
            scheduler: PeriodicScheduler::new(),
            dispatcher: Dispatcher::new(),
            motion: MotionController::new(detector),
            motion_endpoint,
            limiter: RateLimiter::new(config.min_network_interval_ms),
            config,
            completed: AtomicU32::new(0),
            failed: AtomicU32::new(0),
        })
    }

    // Command layer

    /// Start (or restart) periodic sampling of `sensor` into a sink
    pub fn start_periodic(
        &self,
        sensor: &str,
        kind: SinkKind,
        destination: &str,
        period_s: u32,
        now_ms: u64,
    ) -> Result<(), SchedulerError> {
        let endpoint = self.endpoint(sensor)?;
        if period_s == 0 {
            return Err(SchedulerError::InvalidPeriod);
        }
        let sink = Sink::new(kind, destination)?;
        self.scheduler.start(endpoint, sink, period_s, now_ms)
    }

    /// Stop periodic sampling of `sensor` into `kind`
    ///
    /// Stopping a slot that is not armed succeeds. A job already queued
    /// still runs.
    pub fn stop_periodic(&self, sensor: &str, kind: SinkKind) -> Result<(), SchedulerError> {
        let endpoint = self.endpoint(sensor)?;
        self.scheduler.stop(endpoint, kind);
        Ok(())
    }

    /// Arm step or tap detection with the given action
    pub fn start_motion(
        &self,
        detection: Detection,
        kind: SinkKind,
        destination: &str,
    ) -> Result<(), SchedulerError> {
        let action = Sink::new(kind, destination)?;
        self.motion.start(detection, action)
    }

    /// Disarm motion detection
    pub fn stop_motion(&self) -> Result<(), SchedulerError> {
        self.motion.stop()
    }

    /// Sample `sensor` now, bypassing the scheduler
    pub fn read_now(&self, sensor: &str) -> Result<Reading, SensorError> {
        let handle = self
            .registry
            .lookup(sensor)
            .ok_or(SensorError::UnknownSensor)?;
        self.registry
            .get(handle)
            .ok_or(SensorError::UnknownSensor)?
            .sample()
    }

    /// Current schedule of one (sensor, sink) slot
    pub fn schedule(
        &self,
        sensor: &str,
        kind: SinkKind,
    ) -> Result<Option<Schedule>, SchedulerError> {
        Ok(self.endpoint(sensor)?.schedule(kind))
    }

    /// Current motion snapshot
    pub fn motion_state(&self) -> MotionSnapshot {
        self.motion.snapshot()
    }

    // Timer and interrupt context

    /// Board timer tick; fires every due periodic slot
    ///
    /// While motion detection is armed the motion endpoint's periodic
    /// expiries are skipped.
    pub fn on_timer_tick(&self, now_ms: u64) -> usize {
        let suppressed = self.motion.is_armed().then_some(self.motion_endpoint);
        self.scheduler
            .poll(&self.registry, &self.dispatcher, now_ms, suppressed)
    }

    /// Motion interrupt handler
    pub fn on_motion_interrupt(&self, now_ms: u64) -> InterruptOutcome {
        self.motion.on_interrupt(
            self.motion_endpoint,
            now_ms,
            &self.limiter,
            &self.dispatcher,
        )
    }

    // Worker context

    /// Take the next job of a queue without waiting
    pub fn try_next_job(&self, queue: QueueId) -> Option<Job> {
        self.dispatcher.try_next(queue)
    }

    /// Wait for the next job of a queue
    pub async fn next_job(&self, queue: QueueId) -> Job {
        self.dispatcher.next(queue).await
    }

    /// Execute one job; failures are logged and the job discarded
    pub fn execute<F, N>(&self, job: &Job, files: &mut F, net: &mut N) -> Result<(), JobError>
    where
        F: FileSink + ?Sized,
        N: NetworkSink + ?Sized,
    {
        let result = dispatch::execute(job, &self.registry, self.motion.detector(), files, net);
        let name = self
            .registry
            .get(job.endpoint())
            .map(SensorEndpoint::name)
            .unwrap_or("?");
        match &result {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                log::debug!("{} job {} -> {} done", job.queue().as_str(), name, job.sink());
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("{} job {} -> {} failed: {}", job.queue().as_str(), name, job.sink(), e);
            }
        }
        result
    }

    /// Drain a queue synchronously, returning the number of jobs run
    pub fn run_pending<F, N>(&self, queue: QueueId, files: &mut F, net: &mut N) -> usize
    where
        F: FileSink + ?Sized,
        N: NetworkSink + ?Sized,
    {
        let mut ran = 0;
        while let Some(job) = self.dispatcher.try_next(queue) {
            // Failures are already logged and counted
            let _ = self.execute(&job, files, net);
            ran += 1;
        }
        ran
    }

    // Inspection

    /// Snapshot of the dispatch counters
    pub fn stats(&self) -> HubStats {
        HubStats {
            periodic_fired: self.scheduler.fired(),
            periodic_skipped: self.scheduler.skipped(),
            periodic_dropped: self.dispatcher.dropped(QueueId::Periodic),
            motion_enqueued: self.motion.enqueued(),
            motion_ignored: self.motion.ignored(),
            motion_rate_limited: self.motion.rate_limited(),
            motion_dropped: self.dispatcher.dropped(QueueId::Motion),
            jobs_completed: self.completed.load(Ordering::Relaxed),
            jobs_failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// The endpoint registry
    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    /// Handle of the motion endpoint
    pub fn motion_endpoint(&self) -> EndpointHandle {
        self.motion_endpoint
    }

    /// Dispatch tunables in use
    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    fn endpoint(&self, sensor: &str) -> Result<&SensorEndpoint<'a>, SchedulerError> {
        self.registry
            .lookup(sensor)
            .and_then(|h| self.registry.get(h))
            .ok_or(SchedulerError::UnknownSensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionMode;
    use crate::registry::Source;
    use crate::traits::{DetectorError, DeviceSensor, DigitalInput};

    struct Imu;

    impl DeviceSensor for Imu {
        fn sample(&self) -> Result<Reading, SensorError> {
            Reading::from_line("LSM6DSL: ax=0.000 g")
        }
    }

    impl MotionDetector for Imu {
        fn arm(&self, _: Detection) -> Result<(), DetectorError> {
            Ok(())
        }
        fn disarm(&self) -> Result<(), DetectorError> {
            Ok(())
        }
        fn read_step_count(&self) -> Result<u16, DetectorError> {
            Ok(0)
        }
    }

    struct Line;

    impl DigitalInput for Line {
        fn read_state(&self) -> Result<bool, SensorError> {
            Ok(true)
        }
    }

    static IMU: Imu = Imu;
    static LINE: Line = Line;

    fn hub() -> SensorHub<'static> {
        let mut reg = Registry::new();
        reg.register("lsm6dsl", Source::Device(&IMU)).unwrap();
        reg.register("button0", Source::Digital(&LINE)).unwrap();
        SensorHub::new(reg, "lsm6dsl", &IMU, DispatchConfig::default()).unwrap()
    }

    #[test]
    fn test_missing_motion_endpoint() {
        let reg = Registry::new();
        assert!(matches!(
            SensorHub::new(reg, "lsm6dsl", &IMU, DispatchConfig::default()),
            Err(SchedulerError::UnknownSensor)
        ));
    }

    #[test]
    fn test_unknown_sensor() {
        let hub = hub();
        assert_eq!(
            hub.start_periodic("nope", SinkKind::File, "x.log", 1, 0),
            Err(SchedulerError::UnknownSensor)
        );
        assert_eq!(
            hub.stop_periodic("nope", SinkKind::File),
            Err(SchedulerError::UnknownSensor)
        );
        assert_eq!(hub.read_now("nope"), Err(SensorError::UnknownSensor));
    }

    #[test]
    fn test_invalid_period_arms_nothing() {
        let hub = hub();
        assert_eq!(
            hub.start_periodic("button0", SinkKind::File, "b.log", 0, 0),
            Err(SchedulerError::InvalidPeriod)
        );
        assert_eq!(hub.schedule("button0", SinkKind::File), Ok(None));
    }

    #[test]
    fn test_empty_destination() {
        let hub = hub();
        assert_eq!(
            hub.start_motion(Detection::Tap, SinkKind::File, ""),
            Err(SchedulerError::InvalidDestination)
        );
        assert_eq!(hub.motion_state().state.mode(), MotionMode::Disabled);
    }

    #[test]
    fn test_read_now() {
        let hub = hub();
        assert_eq!(
            hub.read_now("button0").unwrap().as_str(),
            "BUTTON0: state=pressed\n"
        );
    }

    #[test]
    fn test_motion_suppresses_periodic() {
        let hub = hub();
        hub.start_periodic("lsm6dsl", SinkKind::File, "imu.log", 1, 0)
            .unwrap();
        hub.start_motion(Detection::Tap, SinkKind::File, "tap.log")
            .unwrap();
        assert_eq!(hub.on_timer_tick(1000), 0);

        hub.stop_motion().unwrap();
        assert_eq!(hub.on_timer_tick(2000), 1);
        assert_eq!(hub.stats().periodic_skipped, 1);
    }
}
