//! Safety limit configuration.

use serde::Deserialize;

use super::units::{Rpm, RpmPerSec};

/// Speed and ramp limits enforced on every request.
///
/// All values are turntable-side units. Requests exceeding a maximum are
/// clamped and reported, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct SafetyLimits {
    /// Maximum turntable speed.
    #[serde(rename = "max_speed_rpm")]
    pub max_speed: Rpm,

    /// Maximum acceleration.
    #[serde(rename = "max_acceleration_rpm_per_sec")]
    pub max_acceleration: RpmPerSec,

    /// Maximum deceleration.
    #[serde(rename = "max_deceleration_rpm_per_sec")]
    pub max_deceleration: RpmPerSec,

    /// Acceleration used when a request does not specify one.
    #[serde(rename = "default_acceleration_rpm_per_sec")]
    pub default_acceleration: RpmPerSec,

    /// Deceleration used when a request does not specify one.
    #[serde(rename = "default_deceleration_rpm_per_sec")]
    pub default_deceleration: RpmPerSec,

    /// A segment is abandoned once it has run longer than this multiple of
    /// its requested duration.
    pub runaway_factor: f32,
}

/// Multiple of the requested duration after which a segment is aborted.
pub const DEFAULT_RUNAWAY_FACTOR: f32 = 2.0;

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_speed: Rpm(20.0),
            max_acceleration: RpmPerSec(40.0),
            max_deceleration: RpmPerSec(40.0),
            default_acceleration: RpmPerSec(10.0),
            default_deceleration: RpmPerSec(10.0),
            runaway_factor: DEFAULT_RUNAWAY_FACTOR,
        }
    }
}

impl SafetyLimits {
    /// Runaway cutoff in milliseconds for a segment of the given duration.
    ///
    /// Exact for every `u32` duration with an integral factor.
    #[inline]
    pub fn runaway_cutoff_ms(&self, duration_ms: u32) -> u64 {
        (f64::from(duration_ms) * f64::from(self.runaway_factor)) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cutoff_is_twice_duration() {
        let limits = SafetyLimits::default();
        assert_eq!(limits.runaway_cutoff_ms(2000), 4000);
        assert_eq!(limits.runaway_cutoff_ms(1), 2);
    }

    #[test]
    fn test_cutoff_exact_for_long_durations() {
        let limits = SafetyLimits::default();
        // Past 2^24 ms an f32 product drops the low bit
        assert_eq!(limits.runaway_cutoff_ms(16_777_217), 33_554_434);
        assert_eq!(limits.runaway_cutoff_ms(u32::MAX), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_custom_factor() {
        let limits = SafetyLimits {
            runaway_factor: 1.5,
            ..SafetyLimits::default()
        };
        assert_eq!(limits.runaway_cutoff_ms(1000), 1500);
    }
}
