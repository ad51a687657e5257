//! Board configuration types
//!
//! Deserialized from board.toml with serde. Every section is optional and
//! falls back to the defaults below.

use std::path::PathBuf;

use serde::Deserialize;

use sensorhub_core::traits::Detection;
use sensorhub_core::{DispatchConfig, SinkKind};
use sensorhub_protocol::DEFAULT_HTTP_PORT;

/// Top-level board configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Log filesystem
    pub storage: StorageConfig,
    /// Network sink
    pub network: NetworkConfig,
    /// Dispatch tunables
    pub dispatch: DispatchConfig,
    /// Startup periodic schedules
    pub periodic: Vec<PeriodicConfig>,
    /// Startup motion mode
    pub motion: Option<MotionConfig>,
    /// Simulated board behaviour
    pub simulation: SimulationConfig,
}

/// `[storage]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory log names are resolved under
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(sensorhub_drivers::sink::DEFAULT_STORAGE_ROOT),
        }
    }
}

/// `[network]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Port used when a destination names none
    pub default_port: u16,
    /// TCP connect timeout
    pub connect_timeout_ms: u64,
    /// Send timeout
    pub io_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_HTTP_PORT,
            connect_timeout_ms: 2000,
            io_timeout_ms: 2000,
        }
    }
}

/// One `[[periodic]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodicConfig {
    /// Endpoint name
    pub sensor: String,
    /// Sink kind
    pub sink: SinkKind,
    /// Log name or telemetry url
    pub destination: String,
    /// Period in seconds
    pub period_s: u32,
}

/// `[motion]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotionConfig {
    /// Detection to arm
    pub mode: Detection,
    /// Sink kind
    pub sink: SinkKind,
    /// Log name or telemetry url
    pub destination: String,
}

/// `[simulation]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Interval between simulated motion events
    pub motion_interrupt_ms: u64,
    /// Every Nth event is a tap (0 = steps only)
    pub tap_every: u32,
    /// Interval between statistics log lines
    pub stats_interval_s: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            motion_interrupt_ms: 750,
            tap_every: 8,
            stats_interval_s: 30,
        }
    }
}
