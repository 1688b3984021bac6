//! HTTP transport module
//!
//! The [`Transport`] trait is the only thing the resource layer knows about
//! HTTP. [`HttpTransport`] is the `reqwest` implementation.
//!
//! # Features
//!
//! - **Default Headers**: `Content-Type: application/json` unless overridden
//! - **Timeouts**: Request and connect timeouts
//! - **Rate Limiting**: Optional token bucket limiter using governor
//! - **Authentication**: Bearer, basic and custom header auth
//!
//! There is no retry or backoff; a failed exchange is reported to the
//! caller as-is.

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpTransport, HttpTransportConfig, HttpTransportConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{RawResponse, Transport, TransportRequest};
