//! LSM6DSL accelerometer and gyroscope
//!
//! Also the board's motion detector: the embedded pedometer raises INT1 on
//! every step and the tap engine raises it on single taps. Only one of the
//! two functions is routed to INT1 at a time.

use portable_atomic::{AtomicU16, AtomicU8, Ordering};
use sensorhub_core::reading::{Reading, ReadingBuilder};
use sensorhub_core::traits::{
    Detection, DetectorError, DeviceSensor, MotionDetector, SensorError,
};

use super::waveform::{SampleClock, Waveform};

const ROUTE_NONE: u8 = 0;
const ROUTE_STEP: u8 = 1;
const ROUTE_TAP: u8 = 2;

/// LSM6DSL inertial module
#[derive(Debug)]
pub struct Lsm6dsl {
    accel: [Waveform; 3],
    gyro: [Waveform; 3],
    clock: SampleClock,
    int1_route: AtomicU8,
    step_counter: AtomicU16,
    ready: bool,
}

impl Lsm6dsl {
    /// Module lying flat with a little wobble; m/s^2 and deg/s
    pub const fn new() -> Self {
        Self {
            accel: [
                Waveform::triangle(0, 300, 40),
                Waveform::triangle(0, 200, 56),
                Waveform::triangle(9_810, 150, 30),
            ],
            gyro: [
                Waveform::triangle(0, 1_500, 64),
                Waveform::triangle(0, 900, 48),
                Waveform::constant(0),
            ],
            clock: SampleClock::new(),
            int1_route: AtomicU8::new(ROUTE_NONE),
            step_counter: AtomicU16::new(0),
            ready: true,
        }
    }

    /// Module that fails its probe
    pub fn absent() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// Function currently routed to INT1
    pub fn armed(&self) -> Option<Detection> {
        match self.int1_route.load(Ordering::Acquire) {
            ROUTE_STEP => Some(Detection::Step),
            ROUTE_TAP => Some(Detection::Tap),
            _ => None,
        }
    }

    /// Simulate one physical event (a step or a tap)
    ///
    /// Steps always advance the pedometer. Returns true when the event is
    /// routed to INT1, i.e. when the interrupt line would fire.
    pub fn simulate_event(&self, event: Detection) -> bool {
        if event == Detection::Step {
            self.step_counter.fetch_add(1, Ordering::Relaxed);
        }
        self.armed() == Some(event)
    }
}

impl DeviceSensor for Lsm6dsl {
    fn sample(&self) -> Result<Reading, SensorError> {
        if !self.ready {
            return Err(SensorError::NotReady);
        }
        let n = self.clock.tick();
        let [ax, ay, az] = self.accel.map(|w| w.at(n));
        let [gx, gy, gz] = self.gyro.map(|w| w.at(n));
        ReadingBuilder::new("lsm6dsl")
            .field("ax", ax, "m/s^2")
            .field("ay", ay, "m/s^2")
            .field("az", az, "m/s^2")
            .field("gx", gx, "dps")
            .field("gy", gy, "dps")
            .field("gz", gz, "dps")
            .finish()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

impl MotionDetector for Lsm6dsl {
    fn arm(&self, detection: Detection) -> Result<(), DetectorError> {
        if !self.ready {
            return Err(DetectorError::NotReady);
        }
        let route = match detection {
            Detection::Step => ROUTE_STEP,
            Detection::Tap => ROUTE_TAP,
        };
        self.int1_route.store(route, Ordering::Release);
        log::debug!("lsm6dsl: INT1 routed to {}", detection);
        Ok(())
    }

    fn disarm(&self) -> Result<(), DetectorError> {
        if !self.ready {
            return Err(DetectorError::NotReady);
        }
        self.int1_route.store(ROUTE_NONE, Ordering::Release);
        Ok(())
    }

    fn read_step_count(&self) -> Result<u16, DetectorError> {
        if !self.ready {
            return Err(DetectorError::NotReady);
        }
        Ok(self.step_counter.load(Ordering::Relaxed))
    }
}
