//! Throttling primitives: per-channel rate limiting and TTL caching.

pub mod cache;
pub mod rate_limiter;

pub use cache::TtlCache;
pub use rate_limiter::RateLimiter;
