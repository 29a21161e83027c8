//! Position tracking for the step generator.

use crate::config::units::Steps;

/// Absolute position and target, in steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    current: Steps,
    target: Steps,
}

impl Position {
    /// Create a tracker at the origin with nothing pending.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position.
    #[inline]
    pub fn current(&self) -> Steps {
        self.current
    }

    /// Target position.
    #[inline]
    pub fn target(&self) -> Steps {
        self.target
    }

    /// Signed distance left to the target.
    #[inline]
    pub fn distance_to_go(&self) -> Steps {
        Steps(self.target.0.saturating_sub(self.current.0))
    }

    /// Set the target relative to the current position, saturating at the
    /// ends of the `i64` range.
    #[inline]
    pub fn target_relative(&mut self, delta: Steps) {
        self.target = Steps(self.current.0.saturating_add(delta.0));
    }

    /// Record one step in the given direction (+1 or -1).
    #[inline]
    pub fn step(&mut self, sign: i64) {
        self.current = Steps(self.current.0.saturating_add(sign));
    }

    /// Redefine the current position and drop any pending target.
    #[inline]
    pub fn reset_to(&mut self, position: Steps) {
        self.current = position;
        self.target = position;
    }
}
