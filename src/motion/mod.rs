//! Motion module for turntable-motion.
//!
//! Request parsing, planning with safety clamping, sequence execution and
//! reporting.

mod clamp;
mod executor;
mod planner;
mod report;
mod request;

pub use clamp::{ClampedRates, SafetyClamp, Warning, Warnings, MAX_WARNINGS};
pub use executor::{ExecutionResult, SegmentOutcome, SequenceExecutor, SequencerState};
pub use planner::{MotionPlan, MotionPlanner, MAX_STEPS_PER_REPETITION};
pub use report::{Report, ReportBuilder};
pub use request::{parse_query, Direction, MotionRequest};
