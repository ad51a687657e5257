//! Job execution
//!
//! Runs in worker context only: samples the endpoint, formats the record
//! and performs the blocking sink write. Failures are reported to the
//! caller for logging and the job is discarded.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::{Sink, SinkKind};
use crate::reading::Reading;
use crate::registry::Registry;
use crate::scheduler::Job;
use crate::traits::{
    Detection, DetectorError, FileSink, MotionDetector, NetworkSink, SensorError, SinkError,
};

/// Why a job produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobError {
    /// Handle does not belong to the registry
    UnknownEndpoint,
    /// Sampling failed
    Sensor(SensorError),
    /// Step counter read failed
    Detector(DetectorError),
    /// Sink write failed
    Sink(SinkError),
}

impl From<SensorError> for JobError {
    fn from(e: SensorError) -> Self {
        JobError::Sensor(e)
    }
}

impl From<DetectorError> for JobError {
    fn from(e: DetectorError) -> Self {
        JobError::Detector(e)
    }
}

impl From<SinkError> for JobError {
    fn from(e: SinkError) -> Self {
        JobError::Sink(e)
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::UnknownEndpoint => f.write_str("unknown endpoint"),
            JobError::Sensor(e) => write!(f, "sensor: {}", e),
            JobError::Detector(e) => write!(f, "{}", e),
            JobError::Sink(e) => write!(f, "{}", e),
        }
    }
}

/// Execute one job end to end
///
/// A periodic job's pending flag is cleared however the job ends.
pub fn execute<F, N>(
    job: &Job,
    registry: &Registry<'_>,
    detector: &dyn MotionDetector,
    files: &mut F,
    net: &mut N,
) -> Result<(), JobError>
where
    F: FileSink + ?Sized,
    N: NetworkSink + ?Sized,
{
    match job {
        Job::PeriodicSample { endpoint, sink } => {
            let endpoint = registry.get(*endpoint).ok_or(JobError::UnknownEndpoint)?;
            let result = endpoint
                .sample()
                .map_err(JobError::from)
                .and_then(|reading| write(sink, &reading, files, net));
            endpoint.release(sink.kind());
            result
        }
        Job::MotionEvent {
            endpoint,
            detection,
            action,
            ..
        } => {
            let endpoint = registry.get(*endpoint).ok_or(JobError::UnknownEndpoint)?;
            let tag = event_tag(*detection, detector)?;
            let reading = endpoint.sample()?.prefixed(tag.as_str())?;
            write(action, &reading, files, net)
        }
    }
}

/// Record prefix for a motion event
///
/// Step events carry the current step counter, read here rather than in
/// the interrupt handler.
fn event_tag(detection: Detection, detector: &dyn MotionDetector) -> Result<String<16>, JobError> {
    let mut tag = String::new();
    let written = match detection {
        Detection::Tap => tag.push_str("[TAP]").map_err(|_| fmt::Error),
        Detection::Step => write!(tag, "[STEP {}]", detector.read_step_count()?),
    };
    written.map_err(|_| JobError::Sensor(SensorError::FormatOverflow))?;
    Ok(tag)
}

fn write<F, N>(sink: &Sink, reading: &Reading, files: &mut F, net: &mut N) -> Result<(), JobError>
where
    F: FileSink + ?Sized,
    N: NetworkSink + ?Sized,
{
    match sink.kind() {
        SinkKind::File => files.append(sink.destination(), reading.as_str())?,
        SinkKind::Network => net.post(sink.destination(), reading.as_str())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Source;
    use crate::traits::{DeviceSensor, IoErrorKind};
    use heapless::Vec;

    struct Imu;

    impl DeviceSensor for Imu {
        fn sample(&self) -> Result<Reading, SensorError> {
            Reading::from_line("LSM6DSL: ax=0.000 g")
        }
    }

    impl MotionDetector for Imu {
        fn arm(&self, _: Detection) -> Result<(), DetectorError> {
            Ok(())
        }
        fn disarm(&self) -> Result<(), DetectorError> {
            Ok(())
        }
        fn read_step_count(&self) -> Result<u16, DetectorError> {
            Ok(7)
        }
    }

    struct Broken;

    impl DeviceSensor for Broken {
        fn sample(&self) -> Result<Reading, SensorError> {
            Err(SensorError::Bus)
        }
    }

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(String<32>, String<64>), 8>,
        fail: bool,
    }

    impl FileSink for Recorder {
        fn append(&mut self, path: &str, record: &str) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Io(IoErrorKind::StorageFull));
            }
            let mut p = String::new();
            p.push_str(path).unwrap();
            let mut r = String::new();
            r.push_str(record).unwrap();
            self.lines.push((p, r)).unwrap();
            Ok(())
        }
    }

    impl NetworkSink for Recorder {
        fn post(&mut self, url: &str, record: &str) -> Result<(), SinkError> {
            self.append(url, record)
        }
    }

    static IMU: Imu = Imu;
    static BROKEN: Broken = Broken;

    #[test]
    fn test_periodic_job_writes_and_releases() {
        let mut reg = Registry::new();
        let h = reg.register("lsm6dsl", Source::Device(&IMU)).unwrap();
        let ep = reg.get(h).unwrap();
        assert!(ep.try_claim(SinkKind::File));

        let mut files = Recorder::default();
        let mut net = Recorder::default();
        let job = Job::PeriodicSample {
            endpoint: h,
            sink: Sink::file("imu.log").unwrap(),
        };
        execute(&job, &reg, &IMU, &mut files, &mut net).unwrap();

        assert_eq!(files.lines.len(), 1);
        assert_eq!(files.lines[0].0.as_str(), "imu.log");
        assert!(net.lines.is_empty());
        assert!(!ep.is_pending(SinkKind::File));
    }

    #[test]
    fn test_failed_job_still_releases() {
        let mut reg = Registry::new();
        let h = reg.register("broken", Source::Device(&BROKEN)).unwrap();
        let ep = reg.get(h).unwrap();
        assert!(ep.try_claim(SinkKind::Network));

        let mut files = Recorder::default();
        let mut net = Recorder::default();
        let job = Job::PeriodicSample {
            endpoint: h,
            sink: Sink::network("host/x").unwrap(),
        };
        assert_eq!(
            execute(&job, &reg, &IMU, &mut files, &mut net),
            Err(JobError::Sensor(SensorError::Bus))
        );
        assert!(!ep.is_pending(SinkKind::Network));
    }

    #[test]
    fn test_sink_failure_releases() {
        let mut reg = Registry::new();
        let h = reg.register("lsm6dsl", Source::Device(&IMU)).unwrap();
        let ep = reg.get(h).unwrap();
        assert!(ep.try_claim(SinkKind::File));

        let mut files = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut net = Recorder::default();
        let job = Job::PeriodicSample {
            endpoint: h,
            sink: Sink::file("imu.log").unwrap(),
        };
        assert_eq!(
            execute(&job, &reg, &IMU, &mut files, &mut net),
            Err(JobError::Sink(SinkError::Io(IoErrorKind::StorageFull)))
        );
        assert!(!ep.is_pending(SinkKind::File));
    }

    #[test]
    fn test_motion_job_tags() {
        let mut reg = Registry::new();
        let h = reg.register("lsm6dsl", Source::Device(&IMU)).unwrap();

        let mut files = Recorder::default();
        let mut net = Recorder::default();
        let step = Job::MotionEvent {
            endpoint: h,
            detection: Detection::Step,
            action: Sink::network("example.com/steps").unwrap(),
            generation: 1,
        };
        let tap = Job::MotionEvent {
            endpoint: h,
            detection: Detection::Tap,
            action: Sink::file("tap.log").unwrap(),
            generation: 2,
        };
        execute(&step, &reg, &IMU, &mut files, &mut net).unwrap();
        execute(&tap, &reg, &IMU, &mut files, &mut net).unwrap();

        assert_eq!(net.lines[0].1.as_str(), "[STEP 7] LSM6DSL: ax=0.000 g\n");
        assert_eq!(files.lines[0].1.as_str(), "[TAP] LSM6DSL: ax=0.000 g\n");
    }
}
