//! Safety clamp for speed and ramp rates.

use core::fmt::Write;

use crate::config::units::{StepsPerSec, StepsPerSecSquared};
use crate::config::{MechanicalConstants, SafetyLimits};

/// Maximum number of warnings a single plan can carry (one per clamped quantity).
pub const MAX_WARNINGS: usize = 3;

/// A human-readable warning.
pub type Warning = heapless::String<96>;

/// Ordered warnings emitted while planning a request.
pub type Warnings = heapless::Vec<Warning, MAX_WARNINGS>;

/// Rates after clamping, in motor-native units.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedRates {
    /// Step rate.
    pub step_rate: StepsPerSec,
    /// Acceleration.
    pub acceleration: StepsPerSecSquared,
    /// Deceleration.
    pub deceleration: StepsPerSecSquared,
    /// One entry per clamped quantity, in speed/acceleration/deceleration order.
    pub warnings: Warnings,
}

/// Limits requested rates to the configured maxima.
///
/// Comparison and substitution both use the native-unit equivalent of each
/// maximum, so a clamped value compares equal to its limit and clamping the
/// output again changes nothing.
#[derive(Debug, Clone, Copy)]
pub struct SafetyClamp {
    constants: MechanicalConstants,
    max_step_rate: StepsPerSec,
    max_acceleration: StepsPerSecSquared,
    max_deceleration: StepsPerSecSquared,
}

impl SafetyClamp {
    /// Create a clamp for the given mechanics and limits.
    pub fn new(constants: MechanicalConstants, limits: &SafetyLimits) -> Self {
        Self {
            constants,
            max_step_rate: constants.rpm_to_steps(limits.max_speed),
            max_acceleration: constants.rpm_per_sec_to_steps(limits.max_acceleration),
            max_deceleration: constants.rpm_per_sec_to_steps(limits.max_deceleration),
        }
    }

    /// Maximum step rate in native units.
    #[inline]
    pub fn max_step_rate(&self) -> StepsPerSec {
        self.max_step_rate
    }

    /// Clamp the requested rates.
    pub fn apply(
        &self,
        step_rate: StepsPerSec,
        acceleration: StepsPerSecSquared,
        deceleration: StepsPerSecSquared,
    ) -> ClampedRates {
        let mut warnings = Warnings::new();

        let step_rate = if step_rate.0 > self.max_step_rate.0 {
            self.warn(
                &mut warnings,
                "Speed",
                self.constants.steps_to_rpm(step_rate).0,
                self.constants.steps_to_rpm(self.max_step_rate).0,
                "RPM",
            );
            self.max_step_rate
        } else {
            step_rate
        };

        let acceleration = if acceleration.0 > self.max_acceleration.0 {
            self.warn(
                &mut warnings,
                "Acceleration",
                self.constants.steps_to_rpm_per_sec(acceleration).0,
                self.constants.steps_to_rpm_per_sec(self.max_acceleration).0,
                "RPM/s",
            );
            self.max_acceleration
        } else {
            acceleration
        };

        let deceleration = if deceleration.0 > self.max_deceleration.0 {
            self.warn(
                &mut warnings,
                "Deceleration",
                self.constants.steps_to_rpm_per_sec(deceleration).0,
                self.constants.steps_to_rpm_per_sec(self.max_deceleration).0,
                "RPM/s",
            );
            self.max_deceleration
        } else {
            deceleration
        };

        ClampedRates {
            step_rate,
            acceleration,
            deceleration,
            warnings,
        }
    }

    fn warn(&self, warnings: &mut Warnings, quantity: &str, requested: f32, limit: f32, unit: &str) {
        #[cfg(feature = "defmt")]
        defmt::warn!("{=str} {} {=str} over limit {}, clamped", quantity, requested, unit, limit);

        let mut msg = Warning::new();
        // Overflow only truncates the message
        let _ = write!(
            msg,
            "{} {:.1} {} exceeds limit {:.1} {}, clamped",
            quantity, requested, unit, limit, unit
        );
        let _ = warnings.push(msg);
    }
}
