//! Pulse-and-position capability consumed by the sequence executor.

use crate::config::units::{Steps, StepsPerSec, StepsPerSecSquared};
use crate::error::Result;

/// A step generator that tracks absolute position and ramps toward a target.
///
/// The executor never generates pulses itself: it sets rates, commands a
/// relative move and then calls [`run`](PulseGenerator::run) until
/// [`distance_to_go`](PulseGenerator::distance_to_go) reaches zero.
pub trait PulseGenerator {
    /// Set the cruise step rate.
    fn set_max_speed(&mut self, rate: StepsPerSec);

    /// Set the acceleration rate.
    fn set_acceleration(&mut self, acceleration: StepsPerSecSquared);

    /// Set the deceleration rate.
    ///
    /// Generators with a single symmetric ramp ignore this and brake at the
    /// acceleration rate.
    fn set_deceleration(&mut self, deceleration: StepsPerSecSquared) {
        let _ = deceleration;
    }

    /// Command a move relative to the current position.
    ///
    /// Replaces any target left over from an unfinished move.
    fn move_by(&mut self, delta: Steps) -> Result<()>;

    /// Signed distance from the current position to the target.
    fn distance_to_go(&self) -> Steps;

    /// Advance one control tick, emitting at most one step if one is due.
    fn run(&mut self) -> Result<()>;

    /// Current absolute position.
    fn current_position(&self) -> Steps;

    /// Redefine the current position; the target moves with it so nothing is pending.
    fn set_current_position(&mut self, position: Steps);
}
