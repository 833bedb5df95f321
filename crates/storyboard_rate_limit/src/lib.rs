//! Retry, request throttling, and configuration.
//!
//! [`call_with_retry`] wraps any fallible async operation whose error
//! implements [`RetryableError`](storyboard_error::RetryableError). Transient
//! errors are retried with exponential backoff; everything else is returned
//! after the first attempt.
//!
//! [`RequestThrottle`] spaces out calls with a GCRA quota, and
//! [`StoryboardConfig`] loads the tunables from layered TOML files.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod retry;
mod throttle;

pub use config::{BatchConfig, FallbackConfig, GeminiConfig, StoryboardConfig};
pub use retry::{CallError, RetryPolicy, call_with_retry, call_with_retry_notify};
pub use throttle::RequestThrottle;
