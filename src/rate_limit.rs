//! Per-caller fixed-window rate limiting.
//!
//! Keyed by `CallerIdentity::rate_limit_key()` (authenticated subject, or
//! client IP when the caller is anonymous). SSE, health and cluster-status
//! paths are exempt and never call into this module.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

struct Window {
    started_at: Instant,
    count: u64,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` if `key` is still within its rate limit, incrementing
    /// its counter as a side effect; resets the window once it has expired.
    pub fn check(&self, key: &str) -> bool {
        let window_len = Duration::from_secs(self.config.window_secs);
        let mut windows = self.windows.lock().unwrap();
        let now = Instant::now();

        let entry = windows.entry(key.to_string()).or_insert_with(|| Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= window_len {
            entry.started_at = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.config.max_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_requests_under_the_limit() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window_secs: 60,
            max_requests: 3,
        });
        assert!(limiter.check("caller-1"));
        assert!(limiter.check("caller-1"));
        assert!(limiter.check("caller-1"));
    }

    #[test]
    fn rejects_requests_over_the_limit() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window_secs: 60,
            max_requests: 2,
        });
        assert!(limiter.check("caller-1"));
        assert!(limiter.check("caller-1"));
        assert!(!limiter.check("caller-1"));
    }

    #[test]
    fn tracks_separate_callers_independently() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window_secs: 60,
            max_requests: 1,
        });
        assert!(limiter.check("caller-1"));
        assert!(limiter.check("caller-2"));
    }
}
