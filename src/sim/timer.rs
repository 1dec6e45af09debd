//! Survival clock
//!
//! Counts running time with pause/resume, and freezes for good on `stop`.

use std::time::Duration;

use crate::platform::time::{Clock, SystemClock};

#[derive(Debug, Clone)]
pub struct RunTimer<C: Clock = SystemClock> {
    clock: C,
    /// Clock reading the current running stretch is measured from
    start: Duration,
    /// Elapsed value frozen by `pause`
    paused: Option<Duration>,
    /// Elapsed value frozen by `stop`
    stopped: Option<Duration>,
}

impl<C: Clock> RunTimer<C> {
    /// Create a timer that starts counting immediately
    pub fn new(clock: C) -> Self {
        let start = clock.now();
        Self {
            clock,
            start,
            paused: None,
            stopped: None,
        }
    }

    /// Restart from zero, running
    pub fn reset(&mut self) {
        self.start = self.clock.now();
        self.paused = None;
        self.stopped = None;
    }

    pub fn pause(&mut self) {
        if self.paused.is_none() && self.stopped.is_none() {
            self.paused = Some(self.running_elapsed());
        }
    }

    pub fn resume(&mut self) {
        if self.stopped.is_some() {
            return;
        }
        if let Some(frozen) = self.paused.take() {
            self.start = self.clock.now().saturating_sub(frozen);
        }
    }

    /// Freeze the final value; only `reset` starts it again
    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.elapsed());
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.stopped
            .or(self.paused)
            .unwrap_or_else(|| self.running_elapsed())
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.is_some()
    }

    /// Current elapsed time as `MM:SS:mmm`
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed())
    }

    fn running_elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }
}

/// Format a duration as zero-padded `MM:SS:mmm`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:03}",
        total_secs / 60,
        total_secs % 60,
        elapsed.subsec_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::time::ManualClock;

    const HALF_SEC: Duration = Duration::from_millis(500);

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:000");
        assert_eq!(format_elapsed(Duration::from_millis(61_042)), "01:01:042");
        assert_eq!(format_elapsed(Duration::from_millis(754_999)), "12:34:999");
    }

    #[test]
    fn test_counts_running_time() {
        let clock = ManualClock::new();
        let timer = RunTimer::new(clock.clone());
        clock.advance(Duration::from_millis(1_250));
        assert_eq!(timer.elapsed(), Duration::from_millis(1_250));
        assert_eq!(timer.formatted(), "00:01:250");
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let clock = ManualClock::new();
        let mut timer = RunTimer::new(clock.clone());
        timer.reset();
        timer.pause();
        clock.advance(HALF_SEC);
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.resume();
        clock.advance(HALF_SEC);
        assert_eq!(timer.elapsed(), HALF_SEC);
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let clock = ManualClock::new();
        let mut timer = RunTimer::new(clock.clone());
        clock.advance(HALF_SEC);
        timer.pause();
        clock.advance(HALF_SEC);
        timer.pause();
        assert_eq!(timer.elapsed(), HALF_SEC);
        timer.resume();
        timer.resume();
        clock.advance(HALF_SEC);
        assert_eq!(timer.elapsed(), 2 * HALF_SEC);
    }

    #[test]
    fn test_stop_freezes_until_reset() {
        let clock = ManualClock::new();
        let mut timer = RunTimer::new(clock.clone());
        clock.advance(Duration::from_secs(3));
        timer.stop();
        clock.advance(Duration::from_secs(10));
        timer.resume();
        assert!(timer.is_stopped());
        assert_eq!(timer.elapsed(), Duration::from_secs(3));

        timer.reset();
        assert!(!timer.is_stopped());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_stop_while_paused_keeps_paused_value() {
        let clock = ManualClock::new();
        let mut timer = RunTimer::new(clock.clone());
        clock.advance(HALF_SEC);
        timer.pause();
        clock.advance(HALF_SEC);
        timer.stop();
        assert_eq!(timer.elapsed(), HALF_SEC);
    }

    #[test]
    fn test_real_clock_pause_resume() {
        let mut timer = RunTimer::new(SystemClock::new());
        timer.reset();
        timer.pause();
        std::thread::sleep(HALF_SEC);
        assert!(timer.elapsed() < Duration::from_millis(50));

        timer.resume();
        std::thread::sleep(HALF_SEC);
        let elapsed = timer.elapsed();
        assert!(elapsed >= HALF_SEC && elapsed < Duration::from_millis(800), "{elapsed:?}");
    }
}
