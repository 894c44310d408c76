//! Rate limiting implementation
//!
//! [`RateLimit`] is the port the dispatcher and page fetcher wait on.
//! [`RateLimiter`] is the built-in token bucket backed by governor.

use crate::error::{Error, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Admission control for outgoing requests
///
/// Implementations may block until a request is allowed. They must return
/// [`Error::Cancelled`] promptly once `ctx` is cancelled.
#[async_trait]
pub trait RateLimit: Send + Sync {
    /// Wait until the caller may issue one request
    async fn wait(&self, ctx: &CancellationToken) -> Result<()>;
}

/// Wait on an optional limiter before issuing a request
///
/// Cancellation comes back as [`Error::Cancelled`]; any other limiter
/// failure is wrapped in [`Error::RateLimited`].
pub async fn admit(limiter: Option<&dyn RateLimit>, ctx: &CancellationToken) -> Result<()> {
    if ctx.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let Some(limiter) = limiter else {
        return Ok(());
    };

    match limiter.wait(ctx).await {
        Ok(()) => Ok(()),
        Err(Error::Cancelled) => Err(Error::Cancelled),
        Err(other) => Err(Error::RateLimited(Box::new(other))),
    }
}

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Limits of the TronGrid free tier without an API key
    pub fn anonymous() -> Self {
        Self {
            requests_per_second: 1,
            burst_size: 1,
        }
    }

    /// Limits of a keyed TronGrid account
    pub fn with_api_key() -> Self {
        Self {
            requests_per_second: 15,
            burst_size: 15,
        }
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rps).allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[async_trait]
impl RateLimit for RateLimiter {
    async fn wait(&self, ctx: &CancellationToken) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tokio::select! {
            biased;
            () = ctx.cancelled() => Err(Error::Cancelled),
            () = self.limiter.until_ready() => Ok(()),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.requests_per_second, 10);
        assert_eq!(config.burst_size, 10);
    }

    #[test]
    fn test_rate_limiter_config_presets() {
        assert_eq!(RateLimiterConfig::anonymous().requests_per_second, 1);
        assert_eq!(RateLimiterConfig::with_api_key().requests_per_second, 15);
    }

    #[test]
    fn test_rate_limiter_config_deserialize() {
        let config: RateLimiterConfig =
            serde_json::from_str(r#"{"requests_per_second": 3, "burst_size": 2}"#).unwrap();
        assert_eq!(config, RateLimiterConfig::new(3, 2));
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_burst() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(10, 5));

        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_zero_config_still_admits() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(0, 0));
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_rate_limiter_wait() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(100, 10));
        let ctx = CancellationToken::new();

        limiter.wait(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limiter_wait_already_cancelled() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(100, 10));
        let ctx = CancellationToken::new();
        ctx.cancel();

        let err = limiter.wait(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    struct Broken;

    #[async_trait]
    impl RateLimit for Broken {
        async fn wait(&self, _ctx: &CancellationToken) -> Result<()> {
            Err(Error::config("limiter backend unavailable"))
        }
    }

    #[tokio::test]
    async fn test_admit_without_limiter() {
        let ctx = CancellationToken::new();
        admit(None, &ctx).await.unwrap();

        ctx.cancel();
        assert!(matches!(admit(None, &ctx).await, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_admit_wraps_limiter_failure() {
        let ctx = CancellationToken::new();
        let err = admit(Some(&Broken), &ctx).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_admit_passes_cancellation_through() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 1));
        assert!(limiter.try_acquire());

        let ctx = CancellationToken::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = admit(Some(&limiter), &ctx).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn test_rate_limiter_wait_cancelled_while_blocked() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 1));
        assert!(limiter.try_acquire());

        let ctx = CancellationToken::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let err = limiter.wait(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(started.elapsed() < Duration::from_millis(900));
    }
}
