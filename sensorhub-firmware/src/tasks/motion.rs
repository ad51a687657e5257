//! Simulated motion source
//!
//! Stands in for the wearer: produces a physical motion event every
//! interval (mostly steps, with a periodic tap) and raises the motion
//! interrupt when the LSM6DSL routes that event to INT1. Also toggles the
//! button now and then so its log has something to show.

use embassy_time::{Duration, Instant, Ticker};
use sensorhub_core::traits::Detection;
use sensorhub_core::{InterruptOutcome, SensorHub};

use crate::board::{BUTTON0, LSM6DSL};

/// Button toggles once per this many motion events
const BUTTON_TOGGLE_EVERY: u32 = 5;

/// Event kind for the `n`th simulated event (1-based)
pub fn event_for(n: u32, tap_every: u32) -> Detection {
    if tap_every > 0 && n % tap_every == 0 {
        Detection::Tap
    } else {
        Detection::Step
    }
}

/// Motion source task
#[embassy_executor::task]
pub async fn motion_source_task(
    hub: &'static SensorHub<'static>,
    interval_ms: u64,
    tap_every: u32,
) {
    log::info!("Motion source started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms.max(1)));
    let mut n: u32 = 0;
    loop {
        ticker.next().await;
        n = n.wrapping_add(1);

        if n % BUTTON_TOGGLE_EVERY == 0 {
            let pressed = BUTTON0.toggle();
            log::debug!("button0 {}", if pressed { "pressed" } else { "released" });
        }

        let event = event_for(n, tap_every);
        if !LSM6DSL.simulate_event(event) {
            continue;
        }
        match hub.on_motion_interrupt(Instant::now().as_millis()) {
            InterruptOutcome::Enqueued => log::debug!("{} interrupt enqueued", event),
            InterruptOutcome::RateLimited => log::debug!("{} interrupt rate limited", event),
            InterruptOutcome::Dropped => {
                log::warn!("{} interrupt dropped, motion queue full", event)
            }
            InterruptOutcome::Ignored => {}
        }
    }
}
