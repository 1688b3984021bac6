//! Transport seam between resources and the network

use crate::error::Result;
use crate::types::{Method, RequestBody, StringMap};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;

/// A fully resolved request handed to a transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the encoded query
    pub url: String,
    /// Per-request headers; these take precedence over transport defaults
    pub headers: StringMap,
    /// Optional body
    pub body: Option<RequestBody>,
}

impl TransportRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: StringMap::new(),
            body: None,
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// What a transport returns for any completed exchange, success or not
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Bytes,
}

impl RawResponse {
    /// Create a raw response
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// Performs HTTP exchanges on behalf of resources.
///
/// Implementations return `Ok` for every exchange that produced a status,
/// including 4xx and 5xx. Raising on failure statuses is the caller's job.
/// `Err` is reserved for exchanges that never completed.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Perform one request
    async fn perform_request(&self, request: TransportRequest) -> Result<RawResponse>;
}
