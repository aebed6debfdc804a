//! Periodic background work with an owned handle.
//!
//! [`RefreshTask`] runs a job on a fixed interval in its own tokio task.
//! The task lives exactly as long as its handle: [`RefreshTask::cancel`]
//! or dropping the handle stops it.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

/// Handle to a job running every `period`.
///
/// The first run happens one full period after spawning. A run that takes
/// longer than the period delays the next one instead of bunching runs up.
///
/// # Example
///
/// ```
/// use seerr_settings::schedule::RefreshTask;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let task = RefreshTask::spawn(Duration::from_secs(30), || async {
///     // reload settings here
/// });
/// assert!(task.is_running());
/// task.cancel();
/// # }
/// ```
#[derive(Debug)]
pub struct RefreshTask {
    handle: JoinHandle<()>,
    period: Duration,
}

impl RefreshTask {
    /// Starts running `job` every `period`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn spawn<F, Fut>(period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        let handle = tokio::spawn(async move {
            while ticks.next().await.is_some() {
                tracing::debug!("Scheduled refresh");
                job().await;
            }
        });

        Self { handle, period }
    }

    /// Returns the interval between runs.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Returns `false` once the job has panicked.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the task. A run in progress is abandoned at its next await.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
