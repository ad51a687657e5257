//! Reproducible test signals

use portable_atomic::{AtomicU32, Ordering};

/// Triangle wave in milli-units
///
/// Sweeps from `center - amplitude` to `center + amplitude` and back over
/// `period` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waveform {
    /// Midpoint of the sweep
    pub center: i32,
    /// Half the peak-to-peak swing
    pub amplitude: i32,
    /// Samples per full cycle
    pub period: u32,
}

impl Waveform {
    /// Constant signal
    pub const fn constant(value: i32) -> Self {
        Self {
            center: value,
            amplitude: 0,
            period: 1,
        }
    }

    /// Create a triangle wave
    pub const fn triangle(center: i32, amplitude: i32, period: u32) -> Self {
        Self {
            center,
            amplitude,
            period,
        }
    }

    /// Value at sample `n`
    pub fn at(&self, n: u32) -> i32 {
        if self.amplitude == 0 || self.period < 2 {
            return self.center;
        }
        let half = i64::from(self.period / 2);
        let phase = i64::from(n % self.period);
        // 0..=half rising, half..period falling
        let ramp = if phase <= half { phase } else { 2 * half - phase };
        let amplitude = i64::from(self.amplitude);
        let offset = -amplitude + 2 * amplitude * ramp / half;
        (i64::from(self.center) + offset) as i32
    }
}

/// Per-device sample counter
#[derive(Debug, Default)]
pub struct SampleClock(AtomicU32);

impl SampleClock {
    /// Counter at zero
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Current sample index, then advance
    pub fn tick(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}
