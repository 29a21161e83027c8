//! Root configuration structure.

use serde::Deserialize;

use super::limits::SafetyLimits;
use super::mechanical::MechanicalConstants;
use super::motor::{DriverConfig, MechanicalConfig};

/// Root device configuration from TOML.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TurntableConfig {
    /// Motor and drive train mechanics.
    pub mechanical: MechanicalConfig,

    /// Speed and ramp limits.
    pub limits: SafetyLimits,

    /// Driver chip wiring.
    pub driver: DriverConfig,
}

impl TurntableConfig {
    /// Mechanical constants derived from this configuration.
    pub fn constants(&self) -> MechanicalConstants {
        MechanicalConstants::from_config(&self.mechanical)
    }
}
