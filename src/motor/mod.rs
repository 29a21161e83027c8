//! Motor module for turntable-motion.
//!
//! Provides the pulse-generator capability the sequencer drives, a STEP/DIR
//! implementation of it with per-step ramping, and the clock it schedules
//! against.

mod builder;
mod clock;
mod driver;
mod position;
mod pulse;
mod ramp;

pub use builder::StepDirDriverBuilder;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::Clock;
pub use driver::StepDirDriver;
pub use position::Position;
pub use pulse::PulseGenerator;
pub use ramp::{MotionPhase, Ramp};
