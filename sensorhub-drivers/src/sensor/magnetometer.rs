//! LIS3MDL three-axis magnetometer

use sensorhub_core::reading::{Reading, ReadingBuilder};
use sensorhub_core::traits::{DeviceSensor, SensorError};

use super::waveform::{SampleClock, Waveform};

/// LIS3MDL magnetometer, values in microtesla
#[derive(Debug)]
pub struct Lis3mdl {
    axes: [Waveform; 3],
    clock: SampleClock,
}

impl Lis3mdl {
    /// Sensor slowly rotating in the earth's field
    pub const fn new() -> Self {
        Self {
            axes: [
                Waveform::triangle(20_000, 15_000, 200),
                Waveform::triangle(-5_000, 15_000, 260),
                Waveform::constant(-42_000),
            ],
            clock: SampleClock::new(),
        }
    }
}

impl DeviceSensor for Lis3mdl {
    fn sample(&self) -> Result<Reading, SensorError> {
        let n = self.clock.tick();
        let [x, y, z] = self.axes.map(|w| w.at(n));
        ReadingBuilder::new("lis3mdl")
            .field("x", x, "uT")
            .field("y", y, "uT")
            .field("z", z, "uT")
            .finish()
    }
}
