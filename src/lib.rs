//! # turntable-motion
//!
//! Motion sequencing for a network-controlled stepper turntable, with
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Request boundary**: Form fields in, textual report out
//! - **Safety clamping**: Speed and ramp rates limited to configured maxima, with warnings
//! - **Repetitions**: Repeated moves with inter-repetition pauses
//! - **Runaway cutoff**: Segments that overrun their time budget are abandoned
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR/ENABLE, `DelayNs` for timing
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use turntable_motion::{MotionService, StdClock, StepDirDriverBuilder};
//!
//! let config = turntable_motion::load_config("turntable.toml")?;
//!
//! let driver = StepDirDriverBuilder::new()
//!     .from_driver_config(&config.driver)
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(pulse_delay)
//!     .clock(StdClock::new())
//!     .build()?;
//!
//! let mut service = MotionService::new(&config, driver, enable_pin, StdClock::new(), delay)?;
//!
//! let report = service.execute_query("angle=90&time=2000&direction=reverse&repetitions=3&repDelay=500")?;
//! println!("{}", report);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and [`StdClock`]
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod service;

// Re-exports for ergonomic API
pub use config::{validate_config, MechanicalConstants, SafetyLimits, TurntableConfig};
pub use error::{Error, Result};
pub use motion::{
    Direction, ExecutionResult, MotionPlan, MotionPlanner, MotionRequest, Report, ReportBuilder,
    SafetyClamp, SequenceExecutor,
};
pub use motor::{Clock, PulseGenerator, StepDirDriver, StepDirDriverBuilder};
pub use service::MotionService;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use motor::StdClock;

// Unit types
pub use config::units::{Degrees, Microsteps, Rpm, RpmPerSec, Steps, StepsPerSec, StepsPerSecSquared};
