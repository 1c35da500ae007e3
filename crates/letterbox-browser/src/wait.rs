//! Bounded waits over live page state
//!
//! Every asynchronous check in the suite is a flat poll-until-timeout: the
//! probe runs, and if it is not yet satisfied the waiter sleeps for the poll
//! interval and tries again until the deadline passes. There is no backoff
//! and no retry after the deadline.
//!
//! Two policies sit on top of the same loop:
//!
//! - [`Waiter::until`] is tolerant and reports a [`WaitOutcome`]
//! - [`Waiter::require`] is strict and turns a timeout into
//!   [`LetterboxError::Timeout`]
//!
//! Errors raised by the probe itself (a missing or stale element) always
//! propagate immediately.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{LetterboxError, Result};
use letterbox_core::config::WaitSettings;

/// Result of a tolerant wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Condition held on the first probe
    Immediate,
    /// Condition became true while polling
    Appeared { after: Duration },
    /// Deadline passed without the condition holding
    TimedOut { after: Duration },
}

impl WaitOutcome {
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, WaitOutcome::TimedOut { .. })
    }
}

/// Flat poll-until-timeout waiter
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for Waiter {
    fn default() -> Self {
        Self::from_settings(&WaitSettings::default())
    }
}

impl Waiter {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    /// Helper-level waiter from configured settings
    pub fn from_settings(settings: &WaitSettings) -> Self {
        Self::new(settings.timeout(), settings.poll_interval())
    }

    /// Page-level waiter from configured settings
    pub fn page_from_settings(settings: &WaitSettings) -> Self {
        Self::new(settings.page_timeout(), settings.poll_interval())
    }

    /// Same polling cadence with a different bound
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self::new(timeout, self.poll_interval)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `probe` until it yields `true` or the timeout elapses
    pub async fn until<F, Fut>(&self, condition: &str, mut probe: F) -> Result<WaitOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();
        let deadline = start + self.timeout;

        if probe().await? {
            return Ok(WaitOutcome::Immediate);
        }

        loop {
            let now = Instant::now();
            if now >= deadline {
                let after = now - start;
                debug!("Gave up waiting for {} after {:?}", condition, after);
                return Ok(WaitOutcome::TimedOut { after });
            }

            sleep(self.poll_interval.min(deadline - now)).await;

            if probe().await? {
                let after = start.elapsed();
                debug!("{} satisfied after {:?}", condition, after);
                return Ok(WaitOutcome::Appeared { after });
            }
        }
    }

    /// Like [`Waiter::until`], but a timeout is an error
    pub async fn require<F, Fut>(&self, condition: &str, probe: F) -> Result<Duration>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        match self.until(condition, probe).await? {
            WaitOutcome::Immediate => Ok(Duration::ZERO),
            WaitOutcome::Appeared { after } => Ok(after),
            WaitOutcome::TimedOut { after } => Err(LetterboxError::Timeout {
                condition: condition.to_string(),
                waited: after,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick() -> Waiter {
        Waiter::new(Duration::from_millis(200), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_immediate_when_already_true() {
        let outcome = quick().until("ready", || async { Ok(true) }).await.unwrap();
        assert_eq!(outcome, WaitOutcome::Immediate);
        assert!(outcome.is_satisfied());
    }

    #[tokio::test]
    async fn test_appears_after_polling() {
        let calls = AtomicUsize::new(0);
        let outcome = quick()
            .until("third probe", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n >= 2) }
            })
            .await
            .unwrap();

        assert!(matches!(outcome, WaitOutcome::Appeared { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_tolerant_timeout_is_not_an_error() {
        let outcome = quick().until("never", || async { Ok(false) }).await.unwrap();
        match outcome {
            WaitOutcome::TimedOut { after } => assert!(after >= Duration::from_millis(200)),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!outcome.is_satisfied());
    }

    #[tokio::test]
    async fn test_strict_timeout_is_an_error() {
        let err = quick()
            .require("modal visible", || async { Ok(false) })
            .await
            .unwrap_err();
        match err {
            LetterboxError::Timeout { condition, waited } => {
                assert_eq!(condition, "modal visible");
                assert!(waited >= Duration::from_millis(200));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_probe_errors_propagate_immediately() {
        let calls = AtomicUsize::new(0);
        let err = quick()
            .until("missing", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<bool, _>(LetterboxError::missing("success modal", "#modal")) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LetterboxError::ElementNotFound { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_settings() {
        let settings = WaitSettings::default();
        assert_eq!(Waiter::from_settings(&settings).timeout(), Duration::from_secs(5));
        assert_eq!(
            Waiter::page_from_settings(&settings).timeout(),
            Duration::from_secs(10)
        );
    }
}
