//! Motion planning: request to per-repetition step target and rates.

use core::fmt::Write;

use crate::config::units::{RpmPerSec, Steps, StepsPerSec, StepsPerSecSquared};
use crate::config::{MechanicalConstants, SafetyLimits};
use crate::error::RequestError;

use super::clamp::{SafetyClamp, Warnings};
use super::request::MotionRequest;

/// Largest step distance a single repetition may cover.
///
/// Any repetition count times this stays inside the `i64` position range.
pub const MAX_STEPS_PER_REPETITION: u64 = i32::MAX as u64;

/// Plan for one request, derived and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPlan {
    /// Signed step delta for one repetition.
    pub step_delta: Steps,

    /// Step rate needed to cover one repetition in the requested time.
    pub requested_step_rate: StepsPerSec,

    /// Step rate after clamping.
    pub step_rate: StepsPerSec,

    /// Acceleration after defaulting and clamping.
    pub acceleration: StepsPerSecSquared,

    /// Deceleration after defaulting and clamping.
    pub deceleration: StepsPerSecSquared,

    /// Clamp warnings, in speed/acceleration/deceleration order.
    pub warnings: Warnings,
}

impl MotionPlan {
    /// True when the request moves nothing; the executor must not touch the motor.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.step_delta.is_zero()
    }

    /// Step distance for one repetition.
    #[inline]
    pub fn steps_per_repetition(&self) -> u64 {
        self.step_delta.abs()
    }
}

/// Turns requests into plans for a fixed mechanism and set of limits.
#[derive(Debug, Clone, Copy)]
pub struct MotionPlanner {
    constants: MechanicalConstants,
    limits: SafetyLimits,
    clamp: SafetyClamp,
}

impl MotionPlanner {
    /// Create a planner.
    pub fn new(constants: MechanicalConstants, limits: SafetyLimits) -> Self {
        Self {
            constants,
            limits,
            clamp: SafetyClamp::new(constants, &limits),
        }
    }

    /// Mechanical constants used for conversions.
    #[inline]
    pub fn constants(&self) -> &MechanicalConstants {
        &self.constants
    }

    /// Safety limits in force.
    #[inline]
    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// Compute the plan for a request.
    ///
    /// # Errors
    ///
    /// Rejects the angle when one repetition would exceed
    /// [`MAX_STEPS_PER_REPETITION`] steps.
    pub fn plan(&self, request: &MotionRequest) -> Result<MotionPlan, RequestError> {
        let magnitude = self.constants.degrees_to_steps(request.angle);
        if magnitude.abs() > MAX_STEPS_PER_REPETITION {
            let mut value = heapless::String::new();
            // Overflow only truncates the echoed value
            let _ = write!(value, "{}", request.angle.0);
            return Err(RequestError::InvalidParameter { name: "angle", value });
        }
        let step_delta = Steps(magnitude.0 * request.direction.sign());

        let requested_step_rate =
            StepsPerSec(magnitude.abs() as f32 / (request.duration_ms as f32 / 1000.0));

        let acceleration = effective_ramp(request.acceleration, self.limits.default_acceleration);
        let deceleration = effective_ramp(request.deceleration, self.limits.default_deceleration);

        let clamped = self.clamp.apply(
            requested_step_rate,
            self.constants.rpm_per_sec_to_steps(acceleration),
            self.constants.rpm_per_sec_to_steps(deceleration),
        );

        Ok(MotionPlan {
            step_delta,
            requested_step_rate,
            step_rate: clamped.step_rate,
            acceleration: clamped.acceleration,
            deceleration: clamped.deceleration,
            warnings: clamped.warnings,
        })
    }
}

fn effective_ramp(requested: Option<RpmPerSec>, default: RpmPerSec) -> RpmPerSec {
    match requested {
        Some(rate) if rate.0 > 0.0 => rate,
        _ => default,
    }
}
