//! Monotonic time source.

/// Something which records elapsed real time in microseconds.
///
/// The reference point is clock-specific (device boot, process start); only
/// differences between two readings are meaningful. Any `Fn() -> u64`
/// closure is a clock, which lets firmware plug in a hardware timer.
pub trait Clock {
    /// Microseconds since the clock's reference point.
    fn now_us(&self) -> u64;

    /// Milliseconds since the clock's reference point.
    #[inline]
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    fn now_us(&self) -> u64 {
        self()
    }
}

/// A monotonically non-decreasing clock backed by the operating system.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StdClock {
    created_at: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose reference point is now.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self {
            created_at: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> u64 {
        self.created_at.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_clock() {
        let clock = || 12_345_678u64;
        assert_eq!(clock.now_us(), 12_345_678);
        assert_eq!(clock.now_ms(), 12_345);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_std_clock_monotonic() {
        let clock = StdClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
