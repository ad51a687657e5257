//! VL53L0X time-of-flight ranging sensor

use sensorhub_core::reading::{Reading, ReadingBuilder};
use sensorhub_core::traits::{DeviceSensor, SensorError};

use super::waveform::{SampleClock, Waveform};

/// Longest distance the sensor reports, in mm
pub const MAX_RANGE_MM: i32 = 2000;

/// VL53L0X ranging sensor
#[derive(Debug)]
pub struct Vl53l0x {
    distance_mm: Waveform,
    clock: SampleClock,
}

impl Vl53l0x {
    /// Target moving between 100 mm and 1500 mm
    pub const fn new() -> Self {
        Self::with_signal(Waveform::triangle(800, 700, 50))
    }

    /// Sensor following the given distance signal (mm)
    pub const fn with_signal(distance_mm: Waveform) -> Self {
        Self {
            distance_mm,
            clock: SampleClock::new(),
        }
    }
}

impl DeviceSensor for Vl53l0x {
    fn sample(&self) -> Result<Reading, SensorError> {
        let mm = self.distance_mm.at(self.clock.tick());
        if !(0..=MAX_RANGE_MM).contains(&mm) {
            return Err(SensorError::OutOfRange);
        }
        ReadingBuilder::new("vl53l0x")
            .count("distance_mm", mm as u32)
            .finish()
    }
}
