//! Step-by-step speed ramp.
//!
//! Asymmetric trapezoid computed one step at a time: while accelerating,
//! v² grows by 2a per step; once the remaining distance is within the
//! stopping distance v²/(2d) the speed falls by 2d per step instead.

use libm::sqrtf;

/// Current phase of a ramped move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise speed.
    Accelerating,
    /// Moving at cruise speed.
    Cruising,
    /// Decelerating toward rest.
    Decelerating,
    /// At rest.
    Complete,
}

/// Speed state of a ramped move, in steps/s and steps/s².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    max_speed: f32,
    acceleration: f32,
    deceleration: f32,
    speed: f32,
    phase: MotionPhase,
}

impl Default for Ramp {
    fn default() -> Self {
        Self {
            max_speed: 0.0,
            acceleration: 0.0,
            deceleration: 0.0,
            speed: 0.0,
            phase: MotionPhase::Complete,
        }
    }
}

impl Ramp {
    /// Set the cruise speed.
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(0.0);
    }

    /// Set the acceleration rate. Zero means "start at cruise speed".
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.acceleration = acceleration.max(0.0);
    }

    /// Set the deceleration rate. Zero means "stop without braking".
    pub fn set_deceleration(&mut self, deceleration: f32) {
        self.deceleration = deceleration.max(0.0);
    }

    /// Cruise speed.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Speed of the most recent step.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Whether the ramp can produce steps at all.
    #[inline]
    pub fn can_move(&self) -> bool {
        self.max_speed > 0.0
    }

    /// Bring the ramp to rest.
    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.phase = MotionPhase::Complete;
    }

    /// Steps needed to brake from the current speed.
    pub fn stopping_distance(&self) -> f32 {
        if self.deceleration > 0.0 {
            self.speed * self.speed / (2.0 * self.deceleration)
        } else {
            0.0
        }
    }

    /// Update the speed after a step has been taken.
    ///
    /// `remaining` is the distance left after that step. Returns the speed
    /// at which the next step should be spaced.
    pub fn advance(&mut self, remaining: u64) -> f32 {
        if remaining == 0 {
            self.stop();
            return 0.0;
        }

        if self.speed <= 0.0 {
            // First step from rest
            self.speed = floor_speed(self.acceleration, self.max_speed);
            self.phase = MotionPhase::Accelerating;
        } else if self.deceleration > 0.0 && remaining as f32 <= self.stopping_distance() {
            let v2 = self.speed * self.speed - 2.0 * self.deceleration;
            let floor = floor_speed(self.deceleration, self.max_speed);
            self.speed = if v2 > floor * floor { sqrtf(v2) } else { floor };
            self.phase = MotionPhase::Decelerating;
        } else if self.speed < self.max_speed {
            let v = sqrtf(self.speed * self.speed + 2.0 * self.acceleration);
            self.speed = if self.acceleration > 0.0 { v.min(self.max_speed) } else { self.max_speed };
            self.phase = if self.speed < self.max_speed {
                MotionPhase::Accelerating
            } else {
                MotionPhase::Cruising
            };
        } else {
            // Cruise speed may have been lowered mid-move
            self.speed = self.max_speed;
            self.phase = MotionPhase::Cruising;
        }

        self.speed
    }

    /// Interval in microseconds between steps at the given speed.
    #[inline]
    pub fn interval_us(speed: f32) -> u64 {
        if speed > 0.0 {
            (1_000_000.0 / speed) as u64
        } else {
            u64::MAX
        }
    }
}

/// Lowest speed used at the ends of a ramp: the speed reached after one step
/// at the given rate, capped by the cruise speed.
fn floor_speed(rate: f32, max_speed: f32) -> f32 {
    if rate > 0.0 {
        sqrtf(2.0 * rate).min(max_speed)
    } else {
        max_speed
    }
}
