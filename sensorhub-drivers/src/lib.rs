//! Board implementations of the core collaborator traits
//!
//! This crate provides concrete implementations of the traits defined
//! in sensorhub-core:
//!
//! - File sink (append-only logs under a storage root)
//! - Network sink (HTTP POST with connect and send timeouts)
//! - Board devices (environment, pressure, magnetometer, IMU with motion
//!   detection, ranging, push button)

#![deny(unsafe_code)]

pub mod sensor;
pub mod sink;

pub use sink::{HttpPoster, LogDirectory};
