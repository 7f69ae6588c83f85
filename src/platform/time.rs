//! Tick pacing
//!
//! Native builds block on a [`Ticker`] between ticks. The web build is driven
//! by `requestAnimationFrame` and uses a [`FixedStep`] accumulator instead.

use std::time::{Duration, Instant};

/// Sleeps until the next fixed-cadence tick
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Time left until the next tick, advancing the deadline.
    ///
    /// A loop that fell more than a period behind starts counting again from
    /// `now` instead of bursting to catch up.
    pub fn delay_from(&mut self, now: Instant) -> Duration {
        let delay = self.next.saturating_duration_since(now);
        self.next = if now > self.next + self.period {
            now + self.period
        } else {
            self.next + self.period
        };
        delay
    }

    /// Block until the next tick
    pub fn wait(&mut self) {
        let delay = self.delay_from(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Fixed timestep accumulator for variable frame times
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add `dt` seconds and return how many ticks are due
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.25);
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_paces_by_period() {
        let period = Duration::from_millis(100);
        let mut ticker = Ticker::new(period);
        let start = ticker.next - period;

        assert_eq!(ticker.delay_from(start + Duration::from_millis(30)), Duration::from_millis(70));
        // Second deadline is one period after the first
        assert_eq!(ticker.delay_from(start + Duration::from_millis(120)), Duration::from_millis(80));
    }

    #[test]
    fn test_ticker_resyncs_when_far_behind() {
        let period = Duration::from_millis(100);
        let mut ticker = Ticker::new(period);
        let late = ticker.next + Duration::from_millis(500);
        assert_eq!(ticker.delay_from(late), Duration::ZERO);
        assert_eq!(ticker.next, late + period);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut step = FixedStep::new(0.1, 8);
        assert_eq!(step.advance(0.05), 0);
        assert_eq!(step.advance(0.06), 1);
        assert_eq!(step.advance(0.2), 2);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut step = FixedStep::new(0.01, 4);
        assert_eq!(step.advance(0.2), 4);
        assert_eq!(step.advance(0.0), 0);
    }

    #[test]
    fn test_fixed_step_reset_drops_partial_tick() {
        let mut step = FixedStep::new(0.1, 8);
        assert_eq!(step.advance(0.08), 0);
        step.reset();
        assert_eq!(step.advance(0.05), 0);
        assert_eq!(step.advance(0.05), 1);
    }
}
