//! Command-facing error type

use core::fmt;

use crate::traits::DetectorError;

/// Errors returned synchronously to the command layer
///
/// None of these are fatal; the scheduler keeps running after any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// No endpoint is registered under the given name
    UnknownSensor,
    /// Period must be a positive number of seconds
    InvalidPeriod,
    /// An endpoint with this name is already registered
    DuplicateName,
    /// The endpoint table is full
    RegistryFull,
    /// Endpoint name does not fit the name buffer
    NameTooLong,
    /// Destination is empty
    InvalidDestination,
    /// Destination does not fit the destination buffer
    DestinationTooLong,
    /// Programming the motion detector failed
    Detector(DetectorError),
}

impl From<DetectorError> for SchedulerError {
    fn from(e: DetectorError) -> Self {
        SchedulerError::Detector(e)
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::UnknownSensor => f.write_str("unknown sensor"),
            SchedulerError::InvalidPeriod => f.write_str("period must be at least 1 second"),
            SchedulerError::DuplicateName => f.write_str("endpoint name already registered"),
            SchedulerError::RegistryFull => f.write_str("endpoint registry is full"),
            SchedulerError::NameTooLong => f.write_str("endpoint name too long"),
            SchedulerError::InvalidDestination => f.write_str("destination is empty"),
            SchedulerError::DestinationTooLong => f.write_str("destination too long"),
            SchedulerError::Detector(e) => write!(f, "motion detector: {}", e),
        }
    }
}
