//! Board timer
//!
//! Drives every periodic schedule from one ticker. Expiries are detected
//! against the embassy clock, so a tick that runs late still fires each
//! due schedule once.

use embassy_time::{Duration, Instant, Ticker};
use sensorhub_core::SensorHub;

/// Timer task - polls the periodic schedules every tick
#[embassy_executor::task]
pub async fn tick_task(hub: &'static SensorHub<'static>) {
    let interval = u64::from(hub.config().tick_interval_ms.max(1));
    log::info!("Tick task started ({} ms)", interval);

    let mut ticker = Ticker::every(Duration::from_millis(interval));
    loop {
        ticker.next().await;
        let fired = hub.on_timer_tick(Instant::now().as_millis());
        if fired > 0 {
            log::trace!("{} periodic job(s) enqueued", fired);
        }
    }
}
