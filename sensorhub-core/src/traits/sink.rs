//! Sink writer traits
//!
//! Both sinks are synchronous and blocking. They only ever run in a worker
//! context.

use core::fmt;

/// File-level failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoErrorKind {
    /// Log name is empty, absolute or escapes the storage root
    InvalidPath,
    /// Storage root is missing
    NotFound,
    /// Storage refused access
    PermissionDenied,
    /// No space left for the record
    StorageFull,
    /// Any other write failure
    WriteFailed,
}

/// Stage at which a best-effort POST failed
///
/// All stages are the same failure kind to callers; the stage is kept
/// for the log line only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkStage {
    /// Url could not be split into host and path
    MalformedUrl,
    /// Host name did not resolve
    Resolve,
    /// No connection could be opened
    Connect,
    /// Request could not be written
    Send,
}

/// Sink failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Append to a log file failed
    Io(IoErrorKind),
    /// Best-effort POST failed
    Network(NetworkStage),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Io(kind) => write!(f, "file sink: {:?}", kind),
            SinkError::Network(stage) => write!(f, "network sink failed at {:?}", stage),
        }
    }
}

/// Append-only log sink
pub trait FileSink {
    /// Append one record to the named log, creating it if absent
    fn append(&mut self, path: &str, record: &str) -> Result<(), SinkError>;
}

/// Fire-and-forget telemetry sink
pub trait NetworkSink {
    /// POST one record to `url`; no response is read
    fn post(&mut self, url: &str, record: &str) -> Result<(), SinkError>;
}
