//! Mechanical constants and unit conversion.

use libm::round;

use super::motor::MechanicalConfig;
use super::units::{Degrees, Rpm, RpmPerSec, Steps, StepsPerSec, StepsPerSecSquared};

/// Derived mechanical parameters computed from the mechanical configuration.
///
/// Computed once at initialization and shared by the planner, the clamp and
/// the report builder. Every conversion between turntable units and
/// motor-native units goes through here:
///
/// `steps/s = rpm × steps_per_revolution × gear_ratio / 60`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechanicalConstants {
    /// Motor-native steps per motor revolution (microstepping included).
    pub steps_per_revolution: u32,

    /// Gear ratio (turntable:motor).
    pub gear_ratio: f32,
}

impl MechanicalConstants {
    /// Create constants from raw values.
    pub const fn new(steps_per_revolution: u32, gear_ratio: f32) -> Self {
        Self {
            steps_per_revolution,
            gear_ratio,
        }
    }

    /// Compute constants from the mechanical configuration.
    pub fn from_config(config: &MechanicalConfig) -> Self {
        Self::new(config.native_steps_per_revolution(), config.gear_ratio)
    }

    /// Motor steps for one full turntable revolution.
    #[inline]
    pub fn steps_per_turn(&self) -> f32 {
        self.steps_per_revolution as f32 * self.gear_ratio
    }

    /// Convert turntable RPM to a motor step rate.
    #[inline]
    pub fn rpm_to_steps(&self, rpm: Rpm) -> StepsPerSec {
        StepsPerSec(rpm.0 * self.steps_per_turn() / 60.0)
    }

    /// Convert a motor step rate to turntable RPM.
    #[inline]
    pub fn steps_to_rpm(&self, rate: StepsPerSec) -> Rpm {
        Rpm(rate.0 * 60.0 / self.steps_per_turn())
    }

    /// Convert RPM/s to steps/s².
    #[inline]
    pub fn rpm_per_sec_to_steps(&self, accel: RpmPerSec) -> StepsPerSecSquared {
        StepsPerSecSquared(accel.0 * self.steps_per_turn() / 60.0)
    }

    /// Convert steps/s² to RPM/s.
    #[inline]
    pub fn steps_to_rpm_per_sec(&self, accel: StepsPerSecSquared) -> RpmPerSec {
        RpmPerSec(accel.0 * 60.0 / self.steps_per_turn())
    }

    /// Convert a turntable angle to the nearest whole number of motor steps.
    ///
    /// Computed in `f64` so the count stays exact for angles far beyond the
    /// point where `f32` can no longer hold every integer step. Saturates at
    /// the `i64` range.
    #[inline]
    pub fn degrees_to_steps(&self, degrees: Degrees) -> Steps {
        Steps(round(f64::from(degrees.0) * self.steps_per_turn_wide() / 360.0) as i64)
    }

    /// Convert a step distance back to a turntable angle.
    #[inline]
    pub fn steps_to_degrees(&self, steps: u64) -> Degrees {
        Degrees((steps as f64 * 360.0 / self.steps_per_turn_wide()) as f32)
    }

    fn steps_per_turn_wide(&self) -> f64 {
        f64::from(self.steps_per_revolution) * f64::from(self.gear_ratio)
    }
}

impl Default for MechanicalConstants {
    fn default() -> Self {
        Self::from_config(&MechanicalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> MechanicalConstants {
        // 200 × 16 microsteps, 3:1 gearing
        MechanicalConstants::new(3200, 3.0)
    }

    #[test]
    fn test_rpm_to_steps() {
        // 7.5 RPM × 9600 steps/turn / 60 = 1200 steps/s
        let rate = constants().rpm_to_steps(Rpm(7.5));
        assert!((rate.0 - 1200.0).abs() < 0.001);
    }

    #[test]
    fn test_steps_to_rpm() {
        let rpm = constants().steps_to_rpm(StepsPerSec(1200.0));
        assert!((rpm.0 - 7.5).abs() < 0.0001);
    }

    #[test]
    fn test_degrees_to_steps_rounds() {
        let c = constants();
        assert_eq!(c.degrees_to_steps(Degrees(90.0)), Steps(2400));
        // 0.01° is 0.27 steps and rounds to nothing
        assert_eq!(c.degrees_to_steps(Degrees(0.01)), Steps(0));
        // 0.1° is 2.67 steps
        assert_eq!(c.degrees_to_steps(Degrees(0.1)), Steps(3));
    }

    #[test]
    fn test_large_angle_rounds_exactly() {
        let c = constants();
        // 1e6° × 9600 / 360 = 26 666 666.67
        assert_eq!(c.degrees_to_steps(Degrees(1_000_000.0)), Steps(26_666_667));
        assert_eq!(c.steps_to_degrees(9600 * 1000), Degrees(360_000.0));
    }

    #[test]
    fn test_steps_to_degrees() {
        let degrees = constants().steps_to_degrees(7200);
        assert!((degrees.0 - 270.0).abs() < 0.001);
    }

    #[test]
    fn test_from_default_config() {
        let c = MechanicalConstants::default();
        assert_eq!(c.steps_per_revolution, 3200);
        assert!((c.gear_ratio - 3.0).abs() < f32::EPSILON);
    }
}
