//! Capability-layer request rate limiting.
//!
//! The generation capability set is a rate-limited shared resource. The
//! pipeline itself applies no concurrency limiting beyond its strict
//! sequential-per-story rule; this limiter is the capability layer's own
//! client-side throttle, using governor's GCRA algorithm.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Requests-per-minute limiter shared by all capability calls of one model.
///
/// A limit of zero disables throttling entirely.
#[derive(Clone)]
pub struct RequestLimiter {
    rpm: Option<Arc<DirectRateLimiter>>,
}

impl RequestLimiter {
    /// Create a limiter enforcing `requests_per_minute`.
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).map(|n| {
            let quota = Quota::per_minute(n);
            Arc::new(GovernorRateLimiter::direct(quota))
        });
        Self { rpm }
    }

    /// Create a limiter that never throttles.
    pub fn unlimited() -> Self {
        Self { rpm: None }
    }

    /// Wait until a request permit is available.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.rpm {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("throttled", &self.rpm.is_some())
            .finish()
    }
}
