//! Configuration type definitions
//!
//! Fixed capacities for the endpoint table, queues and text buffers, plus
//! the sink destination types shared by schedules, motion actions and jobs.

use core::fmt;

use heapless::String;

use crate::error::SchedulerError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of registered endpoints
pub const MAX_ENDPOINTS: usize = 16;

/// Maximum endpoint name length
pub const MAX_NAME_LEN: usize = 16;

/// Maximum destination length (log name or telemetry url)
pub const MAX_DESTINATION_LEN: usize = 128;

/// Maximum formatted reading length, including the trailing newline
pub const MAX_READING_LEN: usize = 192;

/// Depth of the periodic sample queue
pub const PERIODIC_QUEUE_DEPTH: usize = 16;

/// Depth of the motion event queue
pub const MOTION_QUEUE_DEPTH: usize = 8;

/// Default minimum spacing between motion-triggered network jobs
pub const DEFAULT_MIN_NETWORK_INTERVAL_MS: u32 = 500;

/// Default timer tick interval
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 100;

/// Endpoint name storage
pub type EndpointName = String<MAX_NAME_LEN>;

/// Destination storage (log name or url)
pub type Destination = String<MAX_DESTINATION_LEN>;

/// Kind of sink a reading is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SinkKind {
    /// Append-only log file
    File,
    /// Best-effort telemetry POST
    Network,
}

impl SinkKind {
    /// Both sink kinds, in slot order
    pub const ALL: [SinkKind; 2] = [SinkKind::File, SinkKind::Network];

    /// Slot index used for per-sink tables
    pub const fn index(self) -> usize {
        match self {
            SinkKind::File => 0,
            SinkKind::Network => 1,
        }
    }

    /// Lowercase name, as used in config files and logs
    pub const fn as_str(self) -> &'static str {
        match self {
            SinkKind::File => "file",
            SinkKind::Network => "network",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sink together with its destination
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sink {
    /// Log file name, relative to the storage root
    File(Destination),
    /// Telemetry url in `host[:port][/path]` form
    Network(Destination),
}

impl Sink {
    /// Build a sink of the given kind
    ///
    /// Rejects empty destinations and destinations that do not fit the
    /// fixed buffer.
    pub fn new(kind: SinkKind, destination: &str) -> Result<Self, SchedulerError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(SchedulerError::InvalidDestination);
        }

        let mut stored = Destination::new();
        stored
            .push_str(destination)
            .map_err(|_| SchedulerError::DestinationTooLong)?;

        Ok(match kind {
            SinkKind::File => Sink::File(stored),
            SinkKind::Network => Sink::Network(stored),
        })
    }

    /// Build a file sink
    pub fn file(path: &str) -> Result<Self, SchedulerError> {
        Self::new(SinkKind::File, path)
    }

    /// Build a network sink
    pub fn network(url: &str) -> Result<Self, SchedulerError> {
        Self::new(SinkKind::Network, url)
    }

    /// Which kind of sink this is
    pub fn kind(&self) -> SinkKind {
        match self {
            Sink::File(_) => SinkKind::File,
            Sink::Network(_) => SinkKind::Network,
        }
    }

    /// The destination string
    pub fn destination(&self) -> &str {
        match self {
            Sink::File(d) | Sink::Network(d) => d.as_str(),
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.destination())
    }
}

/// Dispatch tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Minimum spacing between accepted motion network jobs (ms)
    pub min_network_interval_ms: u32,
    /// Timer tick interval driving periodic schedules (ms)
    pub tick_interval_ms: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_network_interval_ms: DEFAULT_MIN_NETWORK_INTERVAL_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}
