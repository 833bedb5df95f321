//! Request throttling with a GCRA quota.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces out external calls to stay under a requests-per-minute quota.
///
/// Burst is one request, so consecutive calls are evenly spaced.
///
/// Cheap to clone; clones share one quota.
///
/// # Examples
///
/// ```
/// use storyboard_rate_limit::RequestThrottle;
///
/// assert!(RequestThrottle::per_minute(0).is_none());
///
/// let throttle = RequestThrottle::per_minute(10).unwrap();
/// assert_eq!(throttle.requests_per_minute(), 10);
/// ```
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Arc<DirectRateLimiter>,
    requests_per_minute: u32,
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

impl RequestThrottle {
    /// Create a throttle, or `None` when `requests_per_minute` is zero.
    pub fn per_minute(requests_per_minute: u32) -> Option<Self> {
        NonZeroU32::new(requests_per_minute).map(|n| Self {
            limiter: Arc::new(RateLimiter::direct(
                Quota::per_minute(n).allow_burst(NonZeroU32::MIN),
            )),
            requests_per_minute,
        })
    }

    /// Configured quota.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Wait until the quota allows one more request.
    pub async fn acquire(&self) {
        trace!(rpm = self.requests_per_minute, "Waiting for request quota");
        self.limiter.until_ready().await;
    }

    /// Take a slot if one is free right now.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}
