//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{DriverConfig, MechanicalConfig, SafetyLimits, TurntableConfig};

/// Validate a device configuration.
///
/// Checks:
/// - Steps per revolution and gear ratio are positive
/// - Speed and ramp maxima are positive
/// - Default ramps are positive
/// - The runaway factor is at least 1
pub fn validate_config(config: &TurntableConfig) -> Result<()> {
    validate_mechanical(&config.mechanical)?;
    validate_limits(&config.limits)?;
    validate_driver(&config.driver)?;
    Ok(())
}

fn validate_mechanical(config: &MechanicalConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)));
    }

    if config.gear_ratio <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    Ok(())
}

fn validate_limits(limits: &SafetyLimits) -> Result<()> {
    if limits.max_speed.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(limits.max_speed.0)));
    }

    if limits.max_acceleration.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxAcceleration(
            limits.max_acceleration.0,
        )));
    }

    if limits.max_deceleration.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxDeceleration(
            limits.max_deceleration.0,
        )));
    }

    for default in [limits.default_acceleration, limits.default_deceleration] {
        if default.0 <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidDefaultRamp(default.0)));
        }
    }

    if limits.runaway_factor < 1.0 {
        return Err(Error::Config(ConfigError::InvalidRunawayFactor(
            limits.runaway_factor,
        )));
    }

    Ok(())
}

fn validate_driver(driver: &DriverConfig) -> Result<()> {
    if driver.pulse_width_us == 0 {
        return Err(Error::Config(ConfigError::InvalidPulseWidth(0)));
    }
    Ok(())
}
