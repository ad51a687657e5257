//! Collaborator traits
//!
//! These traits define the interface between the scheduling core and the
//! board-specific sensors, sinks and motion detector.

pub mod detector;
pub mod sensor;
pub mod sink;

pub use detector::{Detection, DetectorError, MotionDetector};
pub use sensor::{DeviceSensor, DigitalInput, SensorError};
pub use sink::{FileSink, IoErrorKind, NetworkSink, NetworkStage, SinkError};
