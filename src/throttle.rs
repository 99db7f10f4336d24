//! Daily request quotas for the enrollment endpoints.
//!
//! Two keyed GCRA limiters, one per caller class. Each caller key gets a
//! burst allowance equal to its daily rate, replenishing evenly across the
//! day, so "5 per day" admits five immediate requests and then refuses
//! until cells replenish. Increment-and-check is a single atomic operation
//! per request, so concurrent requests cannot slip past an exhausted quota.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::config::throttle::ThrottleConfig;
use crate::middleware::auth::Caller;
use crate::utils::errors::AppError;

const SECONDS_PER_DAY: u64 = 86_400;

pub struct Throttles {
    anon: DefaultKeyedRateLimiter<String>,
    user: DefaultKeyedRateLimiter<String>,
}

impl Throttles {
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            anon: RateLimiter::keyed(daily_quota(config.anon_per_day)),
            user: RateLimiter::keyed(daily_quota(config.user_per_day)),
        }
    }

    /// Count this request against the caller's daily quota.
    pub fn check(&self, caller: &Caller) -> Result<(), AppError> {
        let limiter = match caller {
            Caller::User(_) => &self.user,
            Caller::Anonymous(_) => &self.anon,
        };

        limiter.check_key(&caller.throttle_key()).map_err(|_| {
            AppError::too_many_requests("Request was throttled. Daily quota exceeded.")
        })
    }
}

fn daily_quota(per_day: u32) -> Quota {
    let per_day = NonZeroU32::new(per_day.max(1)).expect("per_day is at least 1");
    // Rates above one per second would truncate to a zero period, which
    // governor rejects; floor at one cell per second.
    let replenish_secs = (SECONDS_PER_DAY / u64::from(per_day.get())).max(1);
    Quota::with_period(Duration::from_secs(replenish_secs))
        .expect("replenish period is non-zero")
        .allow_burst(per_day)
}
