//! Backoff schedule for reload requests.

use std::time::Duration;

/// How often, and how patiently, a failed reload is repeated.
///
/// `max_attempts` counts the first request, so `1` disables retrying.
/// Waits grow geometrically from `initial_delay` by `multiplier` and never
/// exceed `max_delay`.
///
/// ```
/// use seerr_settings::service::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_attempts(4)
///     .with_initial_delay(Duration::from_secs(1));
///
/// let waits: Vec<_> = policy.backoff().collect();
/// assert_eq!(
///     waits,
///     [Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Three attempts, waiting 2s then 4s.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }

    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "max_attempts must be at least 1");
        self.max_attempts = max_attempts;
        self
    }

    /// Zero is accepted so tests can retry without waiting. Configuration
    /// never produces it.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// # Panics
    ///
    /// Panics unless `multiplier` is positive.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Wait before retry `n`, counting the first retry as `0`.
    #[must_use]
    pub fn delay_for_retry(&self, n: u32) -> Duration {
        let exponent = i32::try_from(n).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    /// The waits between consecutive attempts, one fewer than
    /// `max_attempts`.
    #[must_use]
    pub const fn backoff(&self) -> Backoff<'_> {
        Backoff {
            policy: self,
            retry: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`RetryPolicy::backoff`].
#[derive(Debug, Clone)]
pub struct Backoff<'a> {
    policy: &'a RetryPolicy,
    retry: u32,
}

impl Iterator for Backoff<'_> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.retry + 1 >= self.policy.max_attempts {
            return None;
        }
        let delay = self.policy.delay_for_retry(self.retry);
        self.retry += 1;
        Some(delay)
    }
}
