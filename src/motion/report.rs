//! Request summaries.

use core::fmt;

use crate::config::units::{Degrees, Rpm, RpmPerSec};
use crate::config::MechanicalConstants;

use super::clamp::Warnings;
use super::executor::ExecutionResult;
use super::planner::MotionPlan;
use super::request::{Direction, MotionRequest};

/// Elapsed times above this are rendered in seconds.
const SECONDS_THRESHOLD_MS: u64 = 10_000;

/// Summary of one executed request.
///
/// The [`Display`](fmt::Display) impl renders the text handed back to the
/// client, warnings first.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Clamp warnings, in the order they were raised.
    pub warnings: Warnings,
    /// Requested repetitions.
    pub repetitions: u32,
    /// Angle per repetition.
    pub angle: Degrees,
    /// Direction of rotation.
    pub direction: Direction,
    /// Angle × repetitions.
    pub expected_angle: Degrees,
    /// Angle actually travelled.
    pub actual_angle: Degrees,
    /// Requested duration of each repetition.
    pub duration_ms: u32,
    /// Pause between repetitions.
    pub rep_delay_ms: u32,
    /// Wall time for the whole request.
    pub elapsed_ms: u64,
    /// Cruise speed commanded to the motor.
    pub speed: Rpm,
    /// Acceleration used.
    pub acceleration: RpmPerSec,
    /// Deceleration used.
    pub deceleration: RpmPerSec,
    /// Steps travelled across all repetitions.
    pub total_steps: u64,
    /// Segments cut short by the runaway cutoff.
    pub aborted_segments: u32,
    /// The angle rounded to zero steps and nothing moved.
    pub noop: bool,
}

impl Report {
    /// Whether any clamp warning was raised.
    #[inline]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Builds [`Report`]s for a fixed mechanism.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    constants: MechanicalConstants,
}

impl ReportBuilder {
    /// Create a builder.
    pub fn new(constants: MechanicalConstants) -> Self {
        Self { constants }
    }

    /// Assemble the report for an executed request.
    pub fn build(&self, request: &MotionRequest, plan: &MotionPlan, result: &ExecutionResult) -> Report {
        Report {
            warnings: plan.warnings.clone(),
            repetitions: request.repetitions,
            angle: request.angle,
            direction: request.direction,
            expected_angle: result.expected_angle,
            actual_angle: result.actual_angle,
            duration_ms: request.duration_ms,
            rep_delay_ms: request.rep_delay_ms,
            elapsed_ms: result.elapsed_ms,
            speed: result.achieved_speed,
            acceleration: self.constants.steps_to_rpm_per_sec(plan.acceleration),
            deceleration: self.constants.steps_to_rpm_per_sec(plan.deceleration),
            total_steps: result.steps_moved,
            aborted_segments: result.aborted_segments,
            noop: plan.is_noop(),
        }
    }
}

/// Renders a millisecond duration, switching to seconds for long runs.
struct Elapsed(u64);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > SECONDS_THRESHOLD_MS {
            write!(f, "{:.1} s", self.0 as f32 / 1000.0)
        } else {
            write!(f, "{} ms", self.0)
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_warnings() {
            writeln!(f, "WARNING")?;
            for warning in &self.warnings {
                writeln!(f, "  ! {}", warning)?;
            }
            writeln!(f)?;
        }

        if self.noop {
            writeln!(f, "No motion: angle is below one step")?;
        } else if self.aborted_segments > 0 {
            writeln!(f, "Motion finished with aborted segments")?;
        } else {
            writeln!(f, "Motion complete")?;
        }

        writeln!(f, "Repetitions: {}", self.repetitions)?;
        writeln!(f, "Angle per repetition: {:.1}° {}", self.angle.0, self.direction)?;
        writeln!(f, "Expected total angle: {:.1}°", self.expected_angle.0)?;
        writeln!(f, "Actual total angle: {:.1}°", self.actual_angle.0)?;
        writeln!(f, "Time per repetition: {} ms", self.duration_ms)?;
        writeln!(f, "Delay between repetitions: {} ms", self.rep_delay_ms)?;
        writeln!(f, "Total time: {}", Elapsed(self.elapsed_ms))?;
        writeln!(f, "Speed: {:.1} RPM", self.speed.0)?;
        writeln!(f, "Acceleration: {:.1} RPM/s", self.acceleration.0)?;
        writeln!(f, "Deceleration: {:.1} RPM/s", self.deceleration.0)?;
        writeln!(f, "Total steps: {}", self.total_steps)?;
        write!(f, "Aborted segments: {}", self.aborted_segments)
    }
}
