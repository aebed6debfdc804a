//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait so retry loops can wait for
//! real in production and not at all in tests.

use std::future::Future;
use std::time::Duration;

/// Abstraction over asynchronous delays.
///
/// # Example
///
/// ```
/// use seerr_settings::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// // Returns at once, whatever the duration.
/// InstantSleeper.sleep(Duration::from_secs(3600)).await;
/// # });
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Useful in tests that exercise retry loops.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_advances_paused_clock() {
        let start = tokio::time::Instant::now();

        TokioSleeper.sleep(Duration::from_secs(5)).await;

        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn instant_sleeper_does_not_wait() {
        let start = tokio::time::Instant::now();

        InstantSleeper.sleep(Duration::from_secs(3600)).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn sleepers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokioSleeper>();
        assert_send_sync::<InstantSleeper>();
    }
}
