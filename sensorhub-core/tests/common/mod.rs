//! Shared test doubles for the hub integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use portable_atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use sensorhub_core::reading::ReadingBuilder;
use sensorhub_core::traits::{
    Detection, DetectorError, DeviceSensor, DigitalInput, FileSink, MotionDetector, NetworkSink,
    SensorError,
};
use sensorhub_core::{DispatchConfig, Reading, Registry, SensorHub, SinkError, Source};

/// Temperature/humidity sensor returning a fixed sample
pub struct Environment;

impl DeviceSensor for Environment {
    fn sample(&self) -> Result<Reading, SensorError> {
        ReadingBuilder::new("hts221")
            .field("temperature", 23_450, "C")
            .field("humidity", 41_200, "%")
            .finish()
    }
}

/// IMU with a controllable step counter
pub struct Imu {
    pub steps: AtomicU16,
    pub armed: Mutex<Option<Detection>>,
    pub arm_calls: AtomicU32,
}

impl Imu {
    pub const fn new() -> Self {
        Self {
            steps: AtomicU16::new(0),
            armed: Mutex::new(None),
            arm_calls: AtomicU32::new(0),
        }
    }
}

impl DeviceSensor for Imu {
    fn sample(&self) -> Result<Reading, SensorError> {
        ReadingBuilder::new("lsm6dsl")
            .field("ax", 12, "g")
            .field("ay", -3, "g")
            .field("az", 1_001, "g")
            .finish()
    }
}

impl MotionDetector for Imu {
    fn arm(&self, detection: Detection) -> Result<(), DetectorError> {
        self.arm_calls.fetch_add(1, Ordering::Relaxed);
        *self.armed.lock().unwrap() = Some(detection);
        Ok(())
    }

    fn disarm(&self) -> Result<(), DetectorError> {
        *self.armed.lock().unwrap() = None;
        Ok(())
    }

    fn read_step_count(&self) -> Result<u16, DetectorError> {
        Ok(self.steps.load(Ordering::Relaxed))
    }
}

/// Push button
pub struct Button {
    pub pressed: AtomicBool,
}

impl DigitalInput for Button {
    fn read_state(&self) -> Result<bool, SensorError> {
        Ok(self.pressed.load(Ordering::Relaxed))
    }
}

/// File sink keeping every appended record in memory
#[derive(Default)]
pub struct MemoryFiles {
    pub logs: HashMap<String, Vec<String>>,
}

impl MemoryFiles {
    pub fn records(&self, path: &str) -> &[String] {
        self.logs.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl FileSink for MemoryFiles {
    fn append(&mut self, path: &str, record: &str) -> Result<(), SinkError> {
        self.logs
            .entry(path.to_string())
            .or_default()
            .push(record.to_string());
        Ok(())
    }
}

/// Network sink recording every POST
#[derive(Default)]
pub struct MemoryNet {
    pub posts: Vec<(String, String)>,
}

impl NetworkSink for MemoryNet {
    fn post(&mut self, url: &str, record: &str) -> Result<(), SinkError> {
        self.posts.push((url.to_string(), record.to_string()));
        Ok(())
    }
}

/// Board with the three test devices, leaked so the hub is `'static`
pub struct Board {
    pub imu: &'static Imu,
    pub button: &'static Button,
    pub hub: SensorHub<'static>,
}

pub fn board(config: DispatchConfig) -> Board {
    let env: &'static Environment = Box::leak(Box::new(Environment));
    let imu: &'static Imu = Box::leak(Box::new(Imu::new()));
    let button: &'static Button = Box::leak(Box::new(Button {
        pressed: AtomicBool::new(false),
    }));

    let mut registry = Registry::new();
    registry.register("hts221", Source::Device(env)).unwrap();
    registry.register("lsm6dsl", Source::Device(imu)).unwrap();
    registry.register("btn", Source::Digital(button)).unwrap();

    let hub = SensorHub::new(registry, "lsm6dsl", imu, config).unwrap();
    Board { imu, button, hub }
}
