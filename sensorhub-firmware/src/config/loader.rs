//! Configuration loading
//!
//! Reads board.toml from the given path, or from the working directory,
//! and falls back to the copy embedded at build time.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::types::BoardConfig;

/// Embedded default configuration (validated by build.rs)
pub const EMBEDDED_CONFIG: &str = include_str!("../../board.toml");

/// Parse a board configuration
pub fn parse_config(content: &str) -> Result<BoardConfig> {
    toml::from_str(content).context("invalid board configuration")
}

/// Load the board configuration
///
/// An explicit path must exist. Without one, `./board.toml` is used when
/// present, else the embedded default.
pub fn load_config(path: Option<&Path>) -> Result<BoardConfig> {
    if let Some(path) = path {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        return parse_config(&content).with_context(|| format!("in {}", path.display()));
    }

    let local = Path::new("board.toml");
    if local.exists() {
        return load_config(Some(local));
    }

    log::info!("No board.toml found, using embedded defaults");
    parse_config(EMBEDDED_CONFIG)
}
