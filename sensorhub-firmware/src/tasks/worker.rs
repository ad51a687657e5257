//! Sink workers
//!
//! One worker per queue, each on its own executor thread, so a slow log
//! write or network post never stalls the other queue or the timer.

use sensorhub_core::{QueueId, SensorHub};
use sensorhub_drivers::{HttpPoster, LogDirectory};

/// Worker task - executes jobs from one queue forever
#[embassy_executor::task(pool_size = 2)]
pub async fn worker_task(
    hub: &'static SensorHub<'static>,
    queue: QueueId,
    mut files: LogDirectory,
    mut net: HttpPoster,
) {
    log::info!("{} worker started", queue.as_str());

    loop {
        let job = hub.next_job(queue).await;
        // Failures are logged and counted by the hub
        let _ = hub.execute(&job, &mut files, &mut net);
    }
}
