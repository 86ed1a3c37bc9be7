//! Time management utilities
//!
//! Everything here is driven by explicit delta times rather than the wall
//! clock, so a simulation stepped with the same inputs replays identically.

/// Frame clock that turns raw frame durations into capped simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: f32,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock that never reports a step longer than `max_delta` seconds
    pub fn new(max_delta: f32) -> Self {
        Self {
            max_delta,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by a raw frame duration and return the capped step
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        self.delta_time = raw_delta.clamp(0.0, self.max_delta);
        self.total_time += f64::from(self.delta_time);
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the last capped step in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Repeating cooldown driven by delta time
///
/// A fresh cooldown is ready immediately; firing it restarts the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Cooldown {
    interval: f32,
    remaining: f32,
}

impl Cooldown {
    /// Create a cooldown that is ready on the first tick
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: 0.0,
        }
    }

    /// Advance by `dt`; returns true (and restarts) when the cooldown expires
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = self.interval;
            true
        } else {
            false
        }
    }

    /// Change the interval without resetting progress
    ///
    /// The remaining time is clamped so a shorter interval takes effect at once.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
        self.remaining = self.remaining.min(interval);
    }

    /// Current interval in seconds
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Seconds until the next expiry
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Progress toward the next expiry (1.0 = ready)
    pub fn progress(&self) -> f32 {
        if self.interval <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining / self.interval).clamp(0.0, 1.0)
        }
    }
}

/// Stopwatch accumulating simulated time while running
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    elapsed: f32,
    running: bool,
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self {
            elapsed: 0.0,
            running: true,
        }
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the stopwatch
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Reset the stopwatch to zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.running = false;
    }

    /// Accumulate `dt` if running
    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Get the elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    /// Get the elapsed time in whole minutes
    pub fn elapsed_minutes(&self) -> f32 {
        self.elapsed / 60.0
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Format seconds as `MM:SS`
pub fn format_mm_ss(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_caps_delta() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.advance(0.5), 0.1);
        assert_eq!(clock.advance(0.05), 0.05);
        assert_eq!(clock.frame_count(), 2);
        assert!((clock.total_time() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_cooldown_ready_immediately_then_waits() {
        let mut cd = Cooldown::new(1.0);
        assert!(cd.tick(0.0));
        assert!(!cd.tick(0.5));
        assert!(!cd.tick(0.4));
        assert!(cd.tick(0.1));
    }

    #[test]
    fn test_cooldown_shorter_interval_applies() {
        let mut cd = Cooldown::new(2.0);
        assert!(cd.tick(0.0));
        cd.set_interval(0.5);
        assert!(cd.remaining() <= 0.5);
        assert!(cd.tick(0.5));
    }

    #[test]
    fn test_stopwatch_only_counts_while_running() {
        let mut sw = Stopwatch::new();
        sw.tick(1.0);
        assert_eq!(sw.elapsed_secs(), 0.0);
        sw.start();
        sw.tick(90.0);
        assert_eq!(sw.elapsed_minutes(), 1.5);
    }

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0.0), "00:00");
        assert_eq!(format_mm_ss(605.9), "10:05");
    }
}
