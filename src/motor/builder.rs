//! Builder pattern for StepDirDriver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::DriverConfig;
use crate::error::{ConfigError, Error, Result};

use super::clock::Clock;
use super::driver::StepDirDriver;

/// Builder for creating StepDirDriver instances.
pub struct StepDirDriverBuilder<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    clock: Option<CLK>,
    invert_direction: bool,
    pulse_width_us: u32,
}

impl<STEP, DIR, DELAY, CLK> Default for StepDirDriverBuilder<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY, CLK> StepDirDriverBuilder<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// Create a new builder.
    pub fn new() -> Self {
        let defaults = DriverConfig::default();
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            clock: None,
            invert_direction: defaults.invert_direction,
            pulse_width_us: defaults.pulse_width_us,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the clock used to schedule steps.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the STEP pulse width in microseconds.
    pub fn pulse_width_us(mut self, width: u32) -> Self {
        self.pulse_width_us = width;
        self
    }

    /// Configure from a DriverConfig.
    pub fn from_driver_config(mut self, config: &DriverConfig) -> Self {
        self.invert_direction = config.invert_direction;
        self.pulse_width_us = config.pulse_width_us;
        self
    }

    /// Build the StepDirDriver.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin, the delay or the clock is missing, or the
    /// pulse width is zero.
    pub fn build(self) -> Result<StepDirDriver<STEP, DIR, DELAY, CLK>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingComponent("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingComponent("dir_pin")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingComponent("delay")))?;
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingComponent("clock")))?;

        if self.pulse_width_us == 0 {
            return Err(Error::Config(ConfigError::InvalidPulseWidth(0)));
        }

        Ok(StepDirDriver::new(
            step_pin,
            dir_pin,
            delay,
            clock,
            self.invert_direction,
            self.pulse_width_us,
        ))
    }
}
