//! Configuration module for turntable-motion.
//!
//! Provides the device configuration (mechanics, safety limits, driver
//! wiring), loading from TOML files (with `std` feature) and validation.

mod limits;
mod mechanical;
mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use limits::{SafetyLimits, DEFAULT_RUNAWAY_FACTOR};
pub use mechanical::MechanicalConstants;
pub use motor::{DriverConfig, MechanicalConfig};
pub use system::TurntableConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Microsteps, Rpm, RpmPerSec, Steps, StepsPerSec, StepsPerSecSquared};
