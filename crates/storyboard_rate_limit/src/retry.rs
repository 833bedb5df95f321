//! Bounded retry with exponential backoff.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyboard_error::{
    GenerationError, GenerationErrorKind, ImageApiError, RetryableError, StoryboardErrorKind,
};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// How many times to try and how long to wait in between.
///
/// The wait before attempt `n + 1` is `base_delay_ms * 2^(n - 1)`, so the
/// default policy waits 1s then 2s. There is no jitter.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyboard_rate_limit::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// let delays: Vec<_> = policy.delays().collect();
/// assert_eq!(delays, vec![Duration::from_millis(1000), Duration::from_millis(2000)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
        }
    }

    /// A single attempt with no retries.
    pub fn no_retry() -> Self {
        Self::new(1, 0)
    }

    /// Script analysis is cheap to wait for and expensive to lose.
    pub fn analysis() -> Self {
        Self::new(5, 10_000)
    }

    /// Waits between attempts, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base = self.base_delay_ms;
        (0..self.max_attempts.saturating_sub(1) as u32)
            .map(move |exponent| Duration::from_millis(base.saturating_mul(1u64 << exponent.min(32))))
    }

    /// Sum of every wait if all attempts fail.
    pub fn total_delay(&self) -> Duration {
        self.delays().sum()
    }
}

/// Error returned by [`call_with_retry`].
///
/// A retryable error that outlasts the policy is reported as
/// [`CallError::MaxRetriesExceeded`] so callers can tell it apart from an
/// error that was never retried.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CallError<E> {
    /// A non-retryable error, returned after the attempt that produced it
    #[display("{}", _0)]
    Fatal(E),
    /// Every attempt failed with a retryable error
    #[display("Max retries exceeded after {} attempts: {}", attempts, last_error)]
    MaxRetriesExceeded {
        /// Attempts made
        attempts: usize,
        /// Error from the last attempt
        last_error: E,
    },
}

impl<E> CallError<E> {
    /// The underlying error.
    pub fn inner(&self) -> &E {
        match self {
            Self::Fatal(e) => e,
            Self::MaxRetriesExceeded { last_error, .. } => last_error,
        }
    }

}

impl<E> std::error::Error for CallError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}

impl From<CallError<ImageApiError>> for StoryboardErrorKind {
    #[track_caller]
    fn from(err: CallError<ImageApiError>) -> Self {
        match err {
            CallError::Fatal(e) => StoryboardErrorKind::ImageApi(e),
            CallError::MaxRetriesExceeded {
                attempts,
                last_error,
            } => StoryboardErrorKind::Generation(GenerationError::new(
                GenerationErrorKind::MaxRetriesExceeded {
                    attempts,
                    last_error,
                },
            )),
        }
    }
}

/// Run `operation` under `policy`.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ImageApiError, ImageApiErrorKind};
/// use storyboard_rate_limit::{CallError, RetryPolicy, call_with_retry};
///
/// # #[tokio::main]
/// # async fn main() {
/// let result: Result<u32, _> = call_with_retry(&RetryPolicy::default(), || async {
///     Err(ImageApiError::new(ImageApiErrorKind::HttpError {
///         status_code: 400,
///         message: "bad request".to_string(),
///     }))
/// })
/// .await;
///
/// assert!(matches!(result, Err(CallError::Fatal(_))));
/// # }
/// ```
pub async fn call_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: F,
) -> Result<T, CallError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    call_with_retry_notify(policy, operation, |_, _, _: &E| {}).await
}

/// Like [`call_with_retry`], calling `notify(attempt, delay, error)` before
/// each backoff wait. `attempt` is the 1-based attempt that just failed.
pub async fn call_with_retry_notify<T, E, F, Fut, N>(
    policy: &RetryPolicy,
    mut operation: F,
    notify: N,
) -> Result<T, CallError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
    N: FnMut(usize, Duration, &E),
{
    let max_attempts = policy.max_attempts.max(1);
    let delays: Vec<Duration> = policy.delays().collect();
    let attempts = AtomicUsize::new(0);
    let notify = Mutex::new(notify);

    let result = Retry::spawn(delays.clone(), || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let call = operation();
        let delays = &delays;
        let notify = &notify;
        async move {
            match call.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() => {
                    if attempt < max_attempts {
                        let delay = delays
                            .get(attempt - 1)
                            .copied()
                            .unwrap_or_default();
                        warn!(
                            attempt,
                            max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Transient error, backing off"
                        );
                        if let Ok(mut notify) = notify.lock() {
                            (notify)(attempt, delay, &e);
                        }
                    }
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Permanent error, not retrying");
                    Err(RetryError::Permanent(e))
                }
            }
        }
    })
    .await;

    result.map_err(|e| {
        let attempts = attempts.load(Ordering::SeqCst);
        if e.is_retryable() {
            warn!(attempts, error = %e, "Retries exhausted");
            CallError::MaxRetriesExceeded {
                attempts,
                last_error: e,
            }
        } else {
            CallError::Fatal(e)
        }
    })
}
