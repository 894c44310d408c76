//! HTTP module
//!
//! Request dispatch and client-side rate limiting.
//!
//! # Features
//!
//! - **Cancellation**: every request is bound to a `CancellationToken`
//! - **API Key Injection**: `TRON-PRO-API-KEY` when configured
//! - **Rate Limiting**: pluggable [`RateLimit`] port with a governor-backed default

mod dispatcher;
mod rate_limit;

pub use dispatcher::Dispatcher;
pub use rate_limit::{admit, RateLimit, RateLimiter, RateLimiterConfig};
