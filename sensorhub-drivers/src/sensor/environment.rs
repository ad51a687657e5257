//! Environmental sensors: HTS221 and LPS22HB

use sensorhub_core::reading::{Reading, ReadingBuilder};
use sensorhub_core::traits::{DeviceSensor, SensorError};

use super::waveform::{SampleClock, Waveform};

/// HTS221 relative humidity range, milli-percent
const HUMIDITY_RANGE: core::ops::RangeInclusive<i32> = 0..=100_000;

/// HTS221 temperature and humidity sensor
#[derive(Debug)]
pub struct Hts221 {
    temperature: Waveform,
    humidity: Waveform,
    clock: SampleClock,
    ready: bool,
}

impl Hts221 {
    /// Sensor with indoor defaults: 22 ± 2 C, 45 ± 10 %
    pub const fn new() -> Self {
        Self::with_signals(
            Waveform::triangle(22_000, 2_000, 120),
            Waveform::triangle(45_000, 10_000, 300),
        )
    }

    /// Sensor following the given signals
    pub const fn with_signals(temperature: Waveform, humidity: Waveform) -> Self {
        Self {
            temperature,
            humidity,
            clock: SampleClock::new(),
            ready: true,
        }
    }

    /// Sensor that fails its probe
    pub fn absent() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }
}

impl DeviceSensor for Hts221 {
    fn sample(&self) -> Result<Reading, SensorError> {
        if !self.ready {
            return Err(SensorError::NotReady);
        }
        let n = self.clock.tick();
        let humidity = self.humidity.at(n);
        if !HUMIDITY_RANGE.contains(&humidity) {
            return Err(SensorError::OutOfRange);
        }
        ReadingBuilder::new("hts221")
            .field("temp", self.temperature.at(n), "C")
            .field("hum", humidity, "%")
            .finish()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// LPS22HB barometric pressure sensor
#[derive(Debug)]
pub struct Lps22hb {
    pressure: Waveform,
    clock: SampleClock,
}

impl Lps22hb {
    /// Sensor near sea level: 101.3 ± 0.4 kPa
    pub const fn new() -> Self {
        Self {
            pressure: Waveform::triangle(101_325, 400, 600),
            clock: SampleClock::new(),
        }
    }
}

impl DeviceSensor for Lps22hb {
    fn sample(&self) -> Result<Reading, SensorError> {
        let n = self.clock.tick();
        ReadingBuilder::new("lps22hb")
            .field("pressure", self.pressure.at(n), "kPa")
            .finish()
    }
}
