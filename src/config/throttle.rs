use std::env;

/// Daily request quotas for the enrollment endpoints.
///
/// Anonymous callers get a small fixed allowance per IP bucket; callers
/// presenting a valid token get a separate, more permissive allowance per
/// subject.
#[derive(Clone, Debug)]
pub struct ThrottleConfig {
    pub anon_per_day: u32,
    pub user_per_day: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            anon_per_day: 5,
            user_per_day: 100,
        }
    }
}

impl ThrottleConfig {
    pub fn from_env() -> Self {
        Self {
            anon_per_day: env::var("THROTTLE_ANON_PER_DAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            user_per_day: env::var("THROTTLE_USER_PER_DAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        }
    }
}
