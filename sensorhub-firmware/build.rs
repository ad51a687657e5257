//! Build script for sensorhub-firmware
//!
//! Validates the embedded board.toml at compile time so a broken default
//! configuration never reaches a board.

use std::fs;
use std::path::Path;

#[path = "build_report.rs"]
mod report;

use report::fail;

/// Endpoints registered by the board module
const KNOWN_SENSORS: &[&str] = &["hts221", "lps22hb", "lis3mdl", "lsm6dsl", "vl53l0x", "button0"];

const SINK_KINDS: &[&str] = &["file", "network"];

const MOTION_MODES: &[&str] = &["step", "tap"];

fn main() {
    validate_config();
}

/// Validate board.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=board.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("board.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in board.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_periodic(&config, &mut errors);
    validate_motion(&config, &mut errors);
    validate_positive(&config, "dispatch", "tick_interval_ms", &mut errors);
    validate_positive(&config, "simulation", "motion_interrupt_ms", &mut errors);
    validate_positive(&config, "simulation", "stats_interval_s", &mut errors);

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    println!("cargo:warning=board.toml validated successfully");
}

/// Validate `[[periodic]]` startup schedules
fn validate_periodic(config: &toml::Value, errors: &mut Vec<String>) {
    let entries = match config.get("periodic") {
        None => return,
        Some(toml::Value::Array(a)) => a,
        Some(_) => {
            errors.push("periodic must be an array of tables ([[periodic]])".to_string());
            return;
        }
    };

    for (i, entry) in entries.iter().enumerate() {
        let ctx = format!("[[periodic]] #{}", i + 1);
        check_choice(entry, &ctx, "sensor", KNOWN_SENSORS, errors);
        check_choice(entry, &ctx, "sink", SINK_KINDS, errors);
        check_destination(entry, &ctx, errors);

        match entry.get("period_s") {
            Some(toml::Value::Integer(p)) if *p > 0 && *p <= i64::from(u32::MAX / 1000) => {}
            Some(toml::Value::Integer(_)) => {
                errors.push(format!("{} period_s must be a positive number of seconds", ctx))
            }
            Some(_) => errors.push(format!("{} period_s must be an integer", ctx)),
            None => errors.push(format!("{} missing 'period_s'", ctx)),
        }
    }
}

/// Validate the optional `[motion]` startup mode
fn validate_motion(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(motion) = config.get("motion") else {
        return;
    };
    check_choice(motion, "[motion]", "mode", MOTION_MODES, errors);
    check_choice(motion, "[motion]", "sink", SINK_KINDS, errors);
    check_destination(motion, "[motion]", errors);
}

fn check_choice(
    table: &toml::Value,
    ctx: &str,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::String(v)) if allowed.contains(&v.as_str()) => {}
        Some(_) => errors.push(format!("{} {} must be one of: {}", ctx, key, allowed.join(", "))),
        None => errors.push(format!("{} missing '{}'", ctx, key)),
    }
}

fn check_destination(table: &toml::Value, ctx: &str, errors: &mut Vec<String>) {
    match table.get("destination") {
        Some(toml::Value::String(d)) if !d.trim().is_empty() => {}
        _ => errors.push(format!("{} needs a non-empty 'destination'", ctx)),
    }
}

fn validate_positive(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = config.get(section).and_then(|s| s.get(key)) {
        if !matches!(value, toml::Value::Integer(v) if *v > 0) {
            errors.push(format!("[{}] {} must be a positive integer", section, key));
        }
    }
}
