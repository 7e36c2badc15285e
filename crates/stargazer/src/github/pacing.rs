//! Proactive request pacing using the governor crate.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Default courtesy pacing between API requests (requests per second).
///
/// The hourly quota is enforced separately by the client's header-driven
/// wait; this limiter only spaces requests out so a long run does not
/// hammer the API in bursts.
pub const COURTESY_RPS: u32 = 2;

/// A standalone request pacer using the governor crate.
///
/// The client calls [`ApiRateLimiter::wait`] before each request. This is
/// independent of quota accounting: quota exhaustion (remaining == 0) is
/// handled by the client sleeping until the advertised window reset.
#[derive(Clone)]
pub struct ApiRateLimiter {
    inner: Arc<GovernorRateLimiter>,
}

impl ApiRateLimiter {
    /// Create a new pacer with the specified requests per second.
    ///
    /// A zero rate is clamped to 1 request per second.
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::new(1).unwrap());
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps));

        Self {
            inner: Arc::new(rate_limiter),
        }
    }

    /// Wait until the pacer allows another request to proceed.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}
