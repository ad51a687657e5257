//! SensorHub - Sensor Board Telemetry Firmware
//!
//! Host build of the sensor board firmware. Devices are simulated, the log
//! filesystem is a directory and the network sink posts over real TCP.
//! The scheduling core is the same one a board build links.
//!
//! Usage: `sensorhub-firmware [board.toml]`

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{anyhow, Context, Result};
use embassy_executor::{Executor, Spawner};
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;

use sensorhub_core::{QueueId, SensorHub};
use sensorhub_drivers::{HttpPoster, LogDirectory};

use crate::config::{load_config, BoardConfig};

mod board;
mod config;
mod tasks;

#[cfg(test)]
#[path = "../build_report.rs"]
mod build_report;

// The hub is shared by the timer, the motion source and both workers
static HUB: StaticCell<SensorHub<'static>> = StaticCell::new();

// One executor per worker thread
static PERIODIC_EXECUTOR: StaticCell<Executor> = StaticCell::new();
static MOTION_EXECUTOR: StaticCell<Executor> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("SensorHub firmware starting...");

    let (hub, config) = match init() {
        Ok(v) => v,
        Err(e) => {
            log::error!("Startup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    let files = LogDirectory::new(config.storage.root.clone());
    let net = HttpPoster::new(
        config.network.default_port,
        StdDuration::from_millis(config.network.connect_timeout_ms),
        StdDuration::from_millis(config.network.io_timeout_ms),
    );
    start_worker(hub, QueueId::Periodic, &PERIODIC_EXECUTOR, files.clone(), net.clone());
    start_worker(hub, QueueId::Motion, &MOTION_EXECUTOR, files, net);

    apply_startup(hub, &config);

    if let Err(e) = spawner.spawn(tasks::tick_task(hub)) {
        log::error!("Failed to spawn tick task: {:?}", e);
    }
    if let Err(e) = spawner.spawn(tasks::motion_source_task(
        hub,
        config.simulation.motion_interrupt_ms,
        config.simulation.tap_every,
    )) {
        log::error!("Failed to spawn motion source: {:?}", e);
    }

    log::info!("All tasks spawned");

    let interval = config.simulation.stats_interval_s.max(1);
    loop {
        Timer::after_secs(interval).await;
        let stats = hub.stats();
        log::info!(
            "periodic fired={} skipped={} dropped={}",
            stats.periodic_fired,
            stats.periodic_skipped,
            stats.periodic_dropped
        );
        log::info!(
            "motion {} enqueued={} ignored={} limited={} dropped={}",
            hub.motion_state().state.mode(),
            stats.motion_enqueued,
            stats.motion_ignored,
            stats.motion_rate_limited,
            stats.motion_dropped
        );
        log::info!("jobs ok={} failed={}", stats.jobs_completed, stats.jobs_failed);
    }
}

/// Load configuration, prepare storage and build the hub
fn init() -> Result<(&'static SensorHub<'static>, BoardConfig)> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(path.as_deref())?;

    prepare_storage(&config.storage.root)?;

    let registry = board::build_registry().map_err(|e| anyhow!("board registry: {}", e))?;
    let hub = SensorHub::new(registry, board::MOTION_ENDPOINT, &board::LSM6DSL, config.dispatch)
        .map_err(|e| anyhow!("sensor hub: {}", e))?;
    log::info!(
        "{} endpoints registered, motion endpoint {}",
        hub.registry().len(),
        board::MOTION_ENDPOINT
    );

    Ok((HUB.init(hub), config))
}

/// Mount the log filesystem
fn prepare_storage(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("failed to create storage root {}", root.display()))?;
    log::info!("Log storage at {}", root.display());
    Ok(())
}

/// Apply the startup schedules; invalid entries are logged and skipped
fn apply_startup(hub: &SensorHub<'_>, config: &BoardConfig) {
    let now = Instant::now().as_millis();
    for p in &config.periodic {
        if let Err(e) = hub.start_periodic(&p.sensor, p.sink, &p.destination, p.period_s, now) {
            log::warn!("Skipping periodic {}: {}", p.sensor, e);
        }
    }

    if let Some(m) = &config.motion {
        if let Err(e) = hub.start_motion(m.mode, m.sink, &m.destination) {
            log::warn!("Skipping motion {}: {}", m.mode, e);
        }
    }
}

/// Run one queue's worker on a dedicated executor thread
fn start_worker(
    hub: &'static SensorHub<'static>,
    queue: QueueId,
    cell: &'static StaticCell<Executor>,
    files: LogDirectory,
    net: HttpPoster,
) {
    let spawned = thread::Builder::new()
        .name(format!("{}-worker", queue.as_str()))
        .spawn(move || {
            let executor = cell.init(Executor::new());
            executor.run(|spawner| {
                if let Err(e) = spawner.spawn(tasks::worker_task(hub, queue, files, net)) {
                    log::error!("Failed to spawn {} worker: {:?}", queue.as_str(), e);
                }
            })
        });
    if let Err(e) = spawned {
        log::error!("Failed to start {} worker thread: {}", queue.as_str(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorhub_core::{DispatchConfig, SinkKind};

    static TEST_EXECUTOR: StaticCell<Executor> = StaticCell::new();

    fn leaked_hub() -> &'static SensorHub<'static> {
        let registry = board::build_registry().unwrap();
        let hub = SensorHub::new(
            registry,
            board::MOTION_ENDPOINT,
            &board::LSM6DSL,
            DispatchConfig::default(),
        )
        .unwrap();
        Box::leak(Box::new(hub))
    }

    #[test]
    fn test_startup_skips_invalid_entries() {
        let hub = leaked_hub();
        let config = config::loader::parse_config(
            r#"
            [[periodic]]
            sensor = "hts221"
            sink = "file"
            destination = "temp.log"
            period_s = 5

            [[periodic]]
            sensor = "nope"
            sink = "file"
            destination = "x.log"
            period_s = 5

            [[periodic]]
            sensor = "lps22hb"
            sink = "network"
            destination = "10.0.0.2/p"
            period_s = 0

            [motion]
            mode = "tap"
            sink = "file"
            destination = "tap.log"
            "#,
        )
        .unwrap();

        apply_startup(hub, &config);

        let temp = hub.schedule("hts221", SinkKind::File).unwrap().unwrap();
        assert_eq!(temp.period_ms, 5000);
        assert!(hub.schedule("lps22hb", SinkKind::Network).unwrap().is_none());
        assert_eq!(hub.motion_state().state.mode(), sensorhub_core::MotionMode::Tap);
    }

    #[test]
    fn test_worker_thread_drains_its_queue() {
        let dir = tempfile::tempdir().unwrap();
        let hub = leaked_hub();
        start_worker(
            hub,
            QueueId::Periodic,
            &TEST_EXECUTOR,
            LogDirectory::new(dir.path()),
            HttpPoster::default(),
        );

        hub.start_periodic("button0", SinkKind::File, "button.log", 1, 0)
            .unwrap();
        assert_eq!(hub.on_timer_tick(1000), 1);

        for _ in 0..200 {
            if hub.stats().jobs_completed > 0 {
                break;
            }
            thread::sleep(StdDuration::from_millis(10));
        }
        assert_eq!(hub.stats().jobs_completed, 1);

        let log = std::fs::read_to_string(dir.path().join("button.log")).unwrap();
        assert!(log.starts_with("BUTTON0: state="), "{:?}", log);
        let button = hub.registry().lookup("button0").unwrap();
        assert!(!hub.registry().get(button).unwrap().is_pending(SinkKind::File));
    }
}
