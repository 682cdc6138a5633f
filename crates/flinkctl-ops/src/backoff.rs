//! Bounded exponential backoff for savepoint polling.

use std::time::{Duration, Instant};

use rand::Rng;

const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;
const DEFAULT_MULTIPLIER: f64 = 1.5;
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Exponential backoff with jitter and an overall elapsed-time budget.
///
/// Intervals start at 500 ms, grow by ×1.5 per step and cap at 60 s. Each
/// interval is jittered by ±50% and clamped to the remaining budget, so the
/// budget is exhausted at approximately `max_elapsed`, never earlier. The
/// clock is monotonic and owned by the instance; a fresh instance (or
/// [`reset`](Self::reset)) starts a fresh budget.
#[derive(Debug)]
pub struct ExponentialBackoff {
    current_interval: Duration,
    randomization_factor: f64,
    multiplier: f64,
    max_interval: Duration,
    max_elapsed: Duration,
    start: Instant,
}

impl ExponentialBackoff {
    /// Create a backoff with the default policy and the given budget.
    #[must_use]
    pub fn new(max_elapsed: Duration) -> Self {
        Self {
            current_interval: DEFAULT_INITIAL_INTERVAL,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            multiplier: DEFAULT_MULTIPLIER,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed,
            start: Instant::now(),
        }
    }

    /// Override the randomization factor (0.0 disables jitter).
    #[must_use]
    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    /// Time elapsed since creation or the last [`reset`](Self::reset).
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The next sleep interval, or `None` once the budget is spent.
    pub fn next_interval(&mut self) -> Option<Duration> {
        let elapsed = self.start.elapsed();
        if elapsed >= self.max_elapsed {
            return None;
        }

        let interval = self.jittered(self.current_interval);
        self.current_interval = self
            .current_interval
            .mul_f64(self.multiplier)
            .min(self.max_interval);

        Some(interval.min(self.max_elapsed - elapsed))
    }

    /// Restart the interval sequence and the elapsed budget.
    pub fn reset(&mut self) {
        self.current_interval = DEFAULT_INITIAL_INTERVAL;
        self.start = Instant::now();
    }

    fn jittered(&self, interval: Duration) -> Duration {
        if self.randomization_factor == 0.0 {
            return interval;
        }

        let delta = interval.mul_f64(self.randomization_factor);
        let min = interval.saturating_sub(delta);
        let span = delta * 2;
        min + span.mul_f64(rand::thread_rng().gen::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_grow_by_multiplier_without_jitter() {
        let mut backoff = ExponentialBackoff::new(Duration::from_secs(3600))
            .with_randomization_factor(0.0);

        assert_eq!(backoff.next_interval(), Some(Duration::from_millis(500)));
        assert_eq!(backoff.next_interval(), Some(Duration::from_millis(750)));
        assert_eq!(backoff.next_interval(), Some(Duration::from_millis(1125)));
    }

    #[test]
    fn intervals_cap_at_max_interval() {
        let mut backoff = ExponentialBackoff::new(Duration::from_secs(86400))
            .with_randomization_factor(0.0);

        let mut last = Duration::ZERO;
        for _ in 0..40 {
            last = backoff.next_interval().unwrap();
            assert!(last <= DEFAULT_MAX_INTERVAL);
        }
        assert_eq!(last, DEFAULT_MAX_INTERVAL);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut backoff = ExponentialBackoff::new(Duration::from_secs(3600));

        let interval = backoff.next_interval().unwrap();
        assert!(interval >= Duration::from_millis(250));
        assert!(interval <= Duration::from_millis(750));
    }

    #[test]
    fn interval_is_clamped_to_remaining_budget() {
        let mut backoff = ExponentialBackoff::new(Duration::from_millis(100))
            .with_randomization_factor(0.0);

        let interval = backoff.next_interval().unwrap();
        assert!(interval <= Duration::from_millis(100));
    }

    #[test]
    fn exhausted_budget_yields_none() {
        let mut backoff = ExponentialBackoff::new(Duration::ZERO);
        assert_eq!(backoff.next_interval(), None);
    }

    #[test]
    fn reset_restarts_the_budget() {
        let mut backoff = ExponentialBackoff::new(Duration::from_secs(60))
            .with_randomization_factor(0.0);

        backoff.next_interval();
        backoff.next_interval();
        backoff.reset();

        assert_eq!(backoff.next_interval(), Some(Duration::from_millis(500)));
    }
}
