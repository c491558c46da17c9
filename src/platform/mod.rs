//! Platform abstraction layer
//!
//! Handles the pieces of the outside world the game loop needs:
//! - A monotonic millisecond clock
//! - Frame pacing for the fixed tick rate

use std::time::{Duration, Instant};

use crate::consts::TICK_RATE;

/// Monotonic milliseconds since some fixed origin
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock anchored at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

/// Per-tick time budget at the fixed rate (16 ms at 60 Hz)
pub const FRAME_BUDGET: Duration = Duration::from_millis(1000 / TICK_RATE as u64);

/// How long to sleep after a frame that took `elapsed`
pub fn remaining_budget(elapsed: Duration) -> Duration {
    FRAME_BUDGET.saturating_sub(elapsed)
}

/// Sleeps away whatever is left of each frame's budget
#[derive(Debug)]
pub struct FramePacer {
    frame_start: Instant,
}

impl FramePacer {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
        }
    }

    /// Block until the current frame's budget is spent, then start the next one
    pub fn wait(&mut self) {
        let sleep = remaining_budget(self.frame_start.elapsed());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
        self.frame_start = Instant::now();
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_budget() {
        assert_eq!(FRAME_BUDGET, Duration::from_millis(16));
        assert_eq!(remaining_budget(Duration::from_millis(6)), Duration::from_millis(10));
        assert_eq!(remaining_budget(Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::default();
        assert_eq!(clock.now_ms(), 0);
        clock.advance(16);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 32);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
