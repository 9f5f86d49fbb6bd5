//! Rate limiting implementation
//!
//! Uses the governor crate with a single-cell quota: one request per
//! interval, no bursts.

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Longest supported spacing between requests
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum spacing between two consecutive requests
    pub min_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
        }
    }
}

impl RateLimiterConfig {
    /// Create a config with the given minimum interval
    pub fn every(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Create a config from fractional seconds.
    ///
    /// Negative and NaN values clamp to zero, anything longer than
    /// [`MAX_INTERVAL`] clamps to it.
    pub fn from_secs_f64(seconds: f64) -> Self {
        let interval = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(MAX_INTERVAL);
        Self::every(interval.min(MAX_INTERVAL))
    }

    /// Whether this config actually delays anything
    pub fn is_enabled(&self) -> bool {
        !self.min_interval.is_zero()
    }
}

/// Minimum-interval rate limiter
///
/// The first request passes immediately; every later one waits until
/// `min_interval` has elapsed since the previous request.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let min_interval = config.min_interval.min(MAX_INTERVAL);
        // with_period yields a burst size of one
        let limiter = Quota::with_period(min_interval).map(|q| Arc::new(Governor::direct(q)));

        Self {
            limiter,
            min_interval,
        }
    }

    /// Configured spacing between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };

        if let Err(not_until) = limiter.check() {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            debug!("Rate limiting: waiting {:.2}s", wait.as_secs_f64());
            limiter.until_ready().await;
        }
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.as_ref().map_or(true, |l| l.check().is_ok())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.min_interval, Duration::from_secs(1));
        assert!(config.is_enabled());
    }

    #[test]
    fn test_rate_limiter_config_from_secs() {
        let config = RateLimiterConfig::from_secs_f64(0.25);
        assert_eq!(config.min_interval, Duration::from_millis(250));

        let config = RateLimiterConfig::from_secs_f64(-3.0);
        assert!(!config.is_enabled());

        assert!(!RateLimiterConfig::from_secs_f64(f64::NAN).is_enabled());
        assert_eq!(RateLimiterConfig::from_secs_f64(1e30).min_interval, MAX_INTERVAL);
    }

    #[test]
    fn test_rate_limiter_clamps_long_intervals() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::MAX));
        assert_eq!(limiter.min_interval(), MAX_INTERVAL);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_rate_limiter_disallows_burst() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::from_secs(60)));

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_zero_interval_never_blocks() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::ZERO));

        for _ in 0..100 {
            assert!(limiter.try_acquire());
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_first_wait_is_immediate() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::from_secs(60)));

        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(&RateLimiterConfig::every(Duration::from_millis(100)));

        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        // two full intervals must pass between three requests
        assert!(start.elapsed() >= Duration::from_millis(180));
    }
}
