//! STEP/DIR stepper driver.
//!
//! Generic over embedded-hal 1.0 pin and delay types plus a [`Clock`].
//! Steps are scheduled against the clock rather than slept, so one call to
//! [`run`](PulseGenerator::run) never blocks for longer than a pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Steps, StepsPerSec, StepsPerSecSquared};
use crate::error::{MotorError, Result};
use crate::motion::Direction;

use super::clock::Clock;
use super::position::Position;
use super::pulse::PulseGenerator;
use super::ramp::{MotionPhase, Ramp};

/// Stepper driver behind a STEP/DIR interface.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the STEP pulse width
/// - `CLK`: Time source used to schedule steps
pub struct StepDirDriver<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward, low = reverse, or inverted).
    dir_pin: DIR,

    /// Delay provider for the STEP pulse width.
    delay: DELAY,

    /// Time source for step scheduling.
    clock: CLK,

    /// Absolute position and target.
    position: Position,

    /// Speed ramp for the current move.
    ramp: Ramp,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// STEP high time in microseconds.
    pulse_width_us: u32,

    /// Clock reading at which the next step is due. `None` means immediately.
    next_step_at: Option<u64>,
}

impl<STEP, DIR, DELAY, CLK> StepDirDriver<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    /// Create a driver at position zero with nothing pending.
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        clock: CLK,
        invert_direction: bool,
        pulse_width_us: u32,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            clock,
            position: Position::new(),
            ramp: Ramp::default(),
            current_direction: None,
            invert_direction,
            pulse_width_us,
            next_step_at: None,
        }
    }

    /// Current motion phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.ramp.phase()
    }

    /// Speed of the most recent step.
    #[inline]
    pub fn speed(&self) -> StepsPerSec {
        StepsPerSec(self.ramp.speed())
    }

    /// Target position of the current move.
    #[inline]
    pub fn target_position(&self) -> Steps {
        self.position.target()
    }

    /// Take the hardware back out of the driver.
    pub fn release(self) -> (STEP, DIR, DELAY, CLK) {
        (self.step_pin, self.dir_pin, self.delay, self.clock)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Reverse => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }

    fn pulse(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.pulse_width_us);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }
}

impl<STEP, DIR, DELAY, CLK> PulseGenerator for StepDirDriver<STEP, DIR, DELAY, CLK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    CLK: Clock,
{
    fn set_max_speed(&mut self, rate: StepsPerSec) {
        self.ramp.set_max_speed(rate.0);
    }

    fn set_acceleration(&mut self, acceleration: StepsPerSecSquared) {
        self.ramp.set_acceleration(acceleration.0);
    }

    fn set_deceleration(&mut self, deceleration: StepsPerSecSquared) {
        self.ramp.set_deceleration(deceleration.0);
    }

    fn move_by(&mut self, delta: Steps) -> Result<()> {
        self.position.target_relative(delta);
        self.ramp.stop();
        self.next_step_at = None;

        let remaining = self.position.distance_to_go();
        if remaining.is_zero() {
            return Ok(());
        }

        let direction = if remaining.0 > 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.set_direction(direction)
    }

    fn distance_to_go(&self) -> Steps {
        self.position.distance_to_go()
    }

    fn run(&mut self) -> Result<()> {
        let remaining = self.position.distance_to_go();
        if remaining.is_zero() || !self.ramp.can_move() {
            return Ok(());
        }

        let now = self.clock.now_us();
        if matches!(self.next_step_at, Some(due) if now < due) {
            return Ok(());
        }

        self.pulse()?;

        let sign = if remaining.0 > 0 { 1 } else { -1 };
        self.position.step(sign);

        let left = self.position.distance_to_go().abs();
        let speed = self.ramp.advance(left);
        self.next_step_at = if left == 0 {
            None
        } else {
            Some(now.saturating_add(Ramp::interval_us(speed)))
        };

        Ok(())
    }

    fn current_position(&self) -> Steps {
        self.position.current()
    }

    fn set_current_position(&mut self, position: Steps) {
        self.position.reset_to(position);
        self.ramp.stop();
        self.next_step_at = None;
    }
}
