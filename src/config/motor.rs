//! Motor mechanics and driver wiring configuration from TOML.

use serde::Deserialize;

use super::units::Microsteps;

/// Mechanical description of the motor and the turntable drive train.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MechanicalConfig {
    /// Base steps per motor revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep setting of the driver chip.
    pub microsteps: Microsteps,

    /// Gear ratio (turntable:motor). 3.0 means three motor turns move the
    /// plate by the same angle one motor turn would at 1:1.
    pub gear_ratio: f32,
}

impl Default for MechanicalConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTEENTH,
            gear_ratio: 3.0,
        }
    }
}

impl MechanicalConfig {
    /// Motor-native steps per motor revolution, microstepping included.
    pub fn native_steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }
}

/// How the STEP/DIR/ENABLE lines of the driver chip are wired.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// ENABLE is active low (A4988, DRV8825, TMC2209 standalone).
    pub enable_active_low: bool,

    /// Invert direction pin logic.
    pub invert_direction: bool,

    /// STEP pulse width in microseconds.
    pub pulse_width_us: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            enable_active_low: true,
            invert_direction: false,
            pulse_width_us: 2,
        }
    }
}
