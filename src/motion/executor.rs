//! Sequence execution: enable, repeated segments, delays, disable.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Degrees, Rpm, Steps};
use crate::config::{MechanicalConstants, SafetyLimits, TurntableConfig};
use crate::error::{MotorError, Result};
use crate::motor::{Clock, PulseGenerator};

use super::planner::MotionPlan;
use super::request::MotionRequest;

/// Where the executor is in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// No request in progress, enable line released.
    #[default]
    Idle,
    /// Enable line asserted, no segment running.
    Enabled,
    /// Driving a segment.
    Moving,
    /// Blocking between repetitions.
    Delaying,
    /// Enable line released, about to return to idle.
    Disabled,
}

/// How one segment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentOutcome {
    /// The target was reached.
    Completed {
        /// Steps travelled.
        steps: u64,
    },
    /// The runaway cutoff fired before the target was reached.
    RunawayAbort {
        /// Steps actually travelled.
        steps: u64,
        /// Steps still outstanding when the segment was abandoned.
        remaining: u64,
        /// Time spent in the segment.
        elapsed_ms: u64,
    },
}

impl SegmentOutcome {
    /// Steps actually travelled in the segment.
    #[inline]
    pub fn steps(&self) -> u64 {
        match *self {
            SegmentOutcome::Completed { steps } => steps,
            SegmentOutcome::RunawayAbort { steps, .. } => steps,
        }
    }

    /// Whether the segment was cut short.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self, SegmentOutcome::RunawayAbort { .. })
    }
}

/// Statistics for one executed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionResult {
    /// Wall time from start to finish of the request.
    pub elapsed_ms: u64,
    /// Unsigned steps travelled across all repetitions.
    pub steps_moved: u64,
    /// Repetitions executed (0 for a no-op).
    pub repetitions: u32,
    /// Segments cut short by the runaway cutoff.
    pub aborted_segments: u32,
    /// Angle × repetitions as requested.
    pub expected_angle: Degrees,
    /// Angle derived from the steps actually travelled.
    pub actual_angle: Degrees,
    /// Cruise speed commanded to the motor, or zero if it never moved.
    pub achieved_speed: Rpm,
}

/// Drives a pulse generator through the repetitions of one request.
///
/// Owns the enable line and the motor for its whole lifetime: the line is
/// asserted once before the first segment and released exactly once after the
/// last, whether segments complete, get aborted, or a pin fails.
pub struct SequenceExecutor<P, EN, C, D>
where
    P: PulseGenerator,
    EN: OutputPin,
    C: Clock,
    D: DelayNs,
{
    pulses: P,
    enable: EN,
    clock: C,
    delay: D,
    constants: MechanicalConstants,
    limits: SafetyLimits,
    enable_active_low: bool,
    state: SequencerState,
}

impl<P, EN, C, D> SequenceExecutor<P, EN, C, D>
where
    P: PulseGenerator,
    EN: OutputPin,
    C: Clock,
    D: DelayNs,
{
    /// Create an executor. The enable line is assumed to start released.
    pub fn new(pulses: P, enable: EN, clock: C, delay: D, config: &TurntableConfig) -> Self {
        Self {
            pulses,
            enable,
            clock,
            delay,
            constants: config.constants(),
            limits: config.limits,
            enable_active_low: config.driver.enable_active_low,
            state: SequencerState::Idle,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The pulse generator being driven.
    #[inline]
    pub fn pulses(&self) -> &P {
        &self.pulses
    }

    /// Take the hardware back out of the executor.
    pub fn release(self) -> (P, EN, C, D) {
        (self.pulses, self.enable, self.clock, self.delay)
    }

    /// Execute a planned request to completion.
    ///
    /// Blocks for the whole sequence. Runaway aborts are counted in the
    /// result; only pin failures are returned as errors, and the enable line
    /// is still released when one occurs.
    pub fn execute(&mut self, request: &MotionRequest, plan: &MotionPlan) -> Result<ExecutionResult> {
        let started_us = self.clock.now_us();
        self.pulses.set_current_position(Steps(0));

        if plan.is_noop() {
            #[cfg(feature = "defmt")]
            defmt::debug!("zero-step request, motor left untouched");

            return Ok(ExecutionResult {
                elapsed_ms: 0,
                steps_moved: 0,
                repetitions: 0,
                aborted_segments: 0,
                expected_angle: request.expected_total_angle(),
                actual_angle: Degrees(0.0),
                achieved_speed: Rpm(0.0),
            });
        }

        self.pulses.set_max_speed(plan.step_rate);
        self.pulses.set_acceleration(plan.acceleration);
        self.pulses.set_deceleration(plan.deceleration);

        self.set_enabled(true)?;
        self.state = SequencerState::Enabled;

        let totals = self.run_repetitions(request, plan);

        self.state = SequencerState::Disabled;
        let released = self.set_enabled(false);
        self.state = SequencerState::Idle;

        let (steps_moved, aborted_segments) = totals?;
        released?;

        let elapsed_ms = self.clock.now_us().saturating_sub(started_us) / 1000;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "sequence done: {} steps in {} ms, {} aborted",
            steps_moved,
            elapsed_ms,
            aborted_segments
        );

        Ok(ExecutionResult {
            elapsed_ms,
            steps_moved,
            repetitions: request.repetitions,
            aborted_segments,
            expected_angle: request.expected_total_angle(),
            actual_angle: self.constants.steps_to_degrees(steps_moved),
            achieved_speed: if steps_moved == 0 {
                Rpm(0.0)
            } else {
                self.constants.steps_to_rpm(plan.step_rate)
            },
        })
    }

    fn run_repetitions(&mut self, request: &MotionRequest, plan: &MotionPlan) -> Result<(u64, u32)> {
        let cutoff_us = self
            .limits
            .runaway_cutoff_ms(request.duration_ms)
            .saturating_mul(1000);

        let mut steps_moved = 0u64;
        let mut aborted = 0u32;

        for repetition in 0..request.repetitions {
            if repetition > 0 && request.rep_delay_ms > 0 {
                self.state = SequencerState::Delaying;
                self.delay.delay_ms(request.rep_delay_ms);
            }

            self.state = SequencerState::Moving;
            let outcome = self.run_segment(plan.step_delta, cutoff_us)?;

            steps_moved += outcome.steps();
            if outcome.is_aborted() {
                aborted += 1;
            }

            #[cfg(feature = "defmt")]
            match outcome {
                SegmentOutcome::Completed { steps } => {
                    defmt::debug!("repetition {} complete: {} steps", repetition + 1, steps)
                }
                SegmentOutcome::RunawayAbort {
                    steps,
                    remaining,
                    elapsed_ms,
                } => defmt::warn!(
                    "repetition {} aborted after {} ms: {} steps moved, {} remaining",
                    repetition + 1,
                    elapsed_ms,
                    steps,
                    remaining
                ),
            }

            self.state = SequencerState::Enabled;
        }

        Ok((steps_moved, aborted))
    }

    /// Drive one relative move until it completes or the cutoff fires.
    ///
    /// The cutoff is strict: a segment is only abandoned once its elapsed
    /// time is greater than `cutoff_us`.
    fn run_segment(&mut self, delta: Steps, cutoff_us: u64) -> Result<SegmentOutcome> {
        let before = self.pulses.current_position();
        let started_us = self.clock.now_us();
        self.pulses.move_by(delta)?;

        loop {
            if self.pulses.distance_to_go().is_zero() {
                let steps = (self.pulses.current_position() - before).abs();
                return Ok(SegmentOutcome::Completed { steps });
            }

            let elapsed_us = self.clock.now_us().saturating_sub(started_us);
            if elapsed_us > cutoff_us {
                let steps = (self.pulses.current_position() - before).abs();
                return Ok(SegmentOutcome::RunawayAbort {
                    steps,
                    remaining: self.pulses.distance_to_go().abs(),
                    elapsed_ms: elapsed_us / 1000,
                });
            }

            self.pulses.run()?;
        }
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let level_high = enabled != self.enable_active_low;
        if level_high {
            self.enable.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.enable.set_low().map_err(|_| MotorError::PinError)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("motor enable line {=str}", if enabled { "asserted" } else { "released" });

        Ok(())
    }
}
