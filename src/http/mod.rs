//! HTTP client module
//!
//! Provides the HTTP client used for page requests.
//!
//! # Features
//!
//! - **Form POST**: Envelope fields sent as `application/x-www-form-urlencoded`
//! - **Bounded Timeout**: Every request carries the configured timeout
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Error Classification**: Timeouts, HTTP status failures and connection
//!   errors map onto distinct [`Error`](crate::Error) variants
//!
//! Failed requests are never retried here; the extractor decides what a
//! failure means for the run.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
