//! Board wiring
//!
//! The sensor board's devices live in statics so endpoints can borrow them
//! for the life of the firmware. Endpoint names are the lowercase part
//! names used by the command layer and board.toml.

use sensorhub_core::registry::Source;
use sensorhub_core::{Registry, SchedulerError};
use sensorhub_drivers::sensor::{Button, Hts221, Lis3mdl, Lps22hb, Lsm6dsl, Vl53l0x};

pub static HTS221: Hts221 = Hts221::new();
pub static LPS22HB: Lps22hb = Lps22hb::new();
pub static LIS3MDL: Lis3mdl = Lis3mdl::new();
/// Motion endpoint; its INT1 line drives the motion interrupt
pub static LSM6DSL: Lsm6dsl = Lsm6dsl::new();
pub static VL53L0X: Vl53l0x = Vl53l0x::new();
/// User button on GPIO
pub static BUTTON0: Button = Button::new();

/// Endpoint sampled for motion events
pub const MOTION_ENDPOINT: &str = "lsm6dsl";

/// Register every board device
pub fn build_registry() -> Result<Registry<'static>, SchedulerError> {
    let mut registry = Registry::new();
    registry.register("hts221", Source::Device(&HTS221))?;
    registry.register("lps22hb", Source::Device(&LPS22HB))?;
    registry.register("lis3mdl", Source::Device(&LIS3MDL))?;
    registry.register(MOTION_ENDPOINT, Source::Device(&LSM6DSL))?;
    registry.register("vl53l0x", Source::Device(&VL53L0X))?;
    registry.register("button0", Source::Digital(&BUTTON0))?;
    Ok(registry)
}
