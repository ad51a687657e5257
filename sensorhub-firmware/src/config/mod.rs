//! Configuration loading and parsing
//!
//! Loads board.toml from disk or the embedded default and parses it with
//! serde + toml.

pub mod loader;
pub mod types;

pub use loader::load_config;
pub use types::BoardConfig;
