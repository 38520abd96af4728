//! Injectable delay source for the orchestrator.

#[cfg(any(test, feature = "test-util"))]
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current task for a duration.
#[async_trait]
pub trait Timer: Send + Sync + std::fmt::Debug {
    /// Waits for `duration` to elapse.
    async fn sleep(&self, duration: Duration);
}

/// Timer backed by [`tokio::time::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(any(test, feature = "test-util"))]
/// Timer that records every requested wait and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    sleeps: Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingTimer {
    /// Creates an empty recording timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the waits requested so far.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the sum of all requested waits.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.sleeps().into_iter().sum()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
