//! Board devices
//!
//! Simulated stand-ins for the sensor board's parts, used by the host
//! firmware build and the tests. Each device advances its own sample
//! counter and derives its values from fixed waveforms, so readings move
//! over time but are reproducible.
//!
//! - HTS221 temperature and humidity
//! - LPS22HB pressure
//! - LIS3MDL magnetometer
//! - LSM6DSL accelerometer and gyro, with step counter and tap detection
//! - VL53L0X time-of-flight ranging
//! - Push button on a GPIO line

pub mod button;
pub mod environment;
pub mod imu;
pub mod magnetometer;
pub mod ranging;
pub mod waveform;

pub use button::Button;
pub use environment::{Hts221, Lps22hb};
pub use imu::Lsm6dsl;
pub use magnetometer::Lis3mdl;
pub use ranging::Vl53l0x;
pub use waveform::Waveform;
