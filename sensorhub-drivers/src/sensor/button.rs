//! Push button on a GPIO line

use portable_atomic::{AtomicBool, Ordering};
use sensorhub_core::traits::{DigitalInput, SensorError};

/// Active-high push button
#[derive(Debug, Default)]
pub struct Button {
    pressed: AtomicBool,
}

impl Button {
    /// Released button
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
        }
    }

    /// Drive the line
    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::Relaxed);
    }

    /// Flip the line, returning the new level
    pub fn toggle(&self) -> bool {
        !self.pressed.fetch_xor(true, Ordering::Relaxed)
    }
}

impl DigitalInput for Button {
    fn read_state(&self) -> Result<bool, SensorError> {
        Ok(self.pressed.load(Ordering::Relaxed))
    }
}
