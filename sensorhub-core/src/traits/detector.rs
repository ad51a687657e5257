//! Motion detector trait
//!
//! The register-level programming of the detector lives in the driver.
//! The core only asks for a detection kind to be armed or disarmed, and
//! reads the step counter from a worker context.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interrupt-driven detection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Detection {
    /// Pedometer step interrupts
    Step,
    /// Single-tap interrupts
    Tap,
}

impl Detection {
    /// Lowercase name, as used in config files and logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Detection::Step => "step",
            Detection::Tap => "tap",
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motion detector failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetectorError {
    /// Device did not answer its probe
    NotReady,
    /// Register transfer failed
    Bus,
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorError::NotReady => f.write_str("detector not ready"),
            DetectorError::Bus => f.write_str("detector bus transfer failed"),
        }
    }
}

/// Trait for the hardware motion detector behind the interrupt line
pub trait MotionDetector: Sync {
    /// Program the detector for `detection`, replacing any previous one
    fn arm(&self, detection: Detection) -> Result<(), DetectorError>;

    /// Stop raising motion interrupts
    fn disarm(&self) -> Result<(), DetectorError>;

    /// Read the pedometer step counter
    ///
    /// Register I/O: call from a worker context only.
    fn read_step_count(&self) -> Result<u16, DetectorError>;
}
