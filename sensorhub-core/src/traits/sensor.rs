//! Sensor source traits

use core::fmt;

use crate::reading::Reading;

/// Errors that can occur while sampling a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No endpoint registered under the requested name
    UnknownSensor,
    /// Device did not pass its readiness check
    NotReady,
    /// Bus or GPIO transfer failed
    Bus,
    /// Device returned a value outside its documented range
    OutOfRange,
    /// Formatted reading does not fit the reading buffer
    FormatOverflow,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SensorError::UnknownSensor => "unknown sensor",
            SensorError::NotReady => "device not ready",
            SensorError::Bus => "bus transfer failed",
            SensorError::OutOfRange => "value out of range",
            SensorError::FormatOverflow => "reading too long",
        };
        f.write_str(msg)
    }
}

/// Trait for device-backed sensors
///
/// Sampling takes `&self`: both worker contexts may sample the same device,
/// so implementations serialize their own bus access.
pub trait DeviceSensor: Sync {
    /// Fetch a fresh sample and format it as one reading line
    fn sample(&self) -> Result<Reading, SensorError>;

    /// Check whether the device answered its probe at boot
    fn is_ready(&self) -> bool {
        true
    }
}

/// Trait for GPIO-backed digital inputs
pub trait DigitalInput: Sync {
    /// Read the current logic level (true = active)
    fn read_state(&self) -> Result<bool, SensorError>;

    /// Check whether the line was configured successfully
    fn is_ready(&self) -> bool {
        true
    }
}
