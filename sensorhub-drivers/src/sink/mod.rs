//! Sink writers
//!
//! - `LogDirectory`: append-only log files under a storage root
//! - `HttpPoster`: fire-and-forget HTTP POST with connect and send timeouts

pub mod file;
pub mod network;

pub use file::{LogDirectory, DEFAULT_STORAGE_ROOT};
pub use network::HttpPoster;
