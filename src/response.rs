//! API responses
//!
//! A [`Response`] wraps one completed exchange. The body is parsed as JSON
//! on first access and cached for the lifetime of the response.

use crate::client::Client;
use crate::collection::Page;
use crate::error::{Error, Result};
use crate::http::RawResponse;
use crate::resource::Resource;
use crate::types::JsonValue;
use bytes::Bytes;
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, LOCATION};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// Message for a body that is empty
pub const EMPTY_BODY_MESSAGE: &str =
    "Response body is empty. (Hint: If you just created a new resource, try: response.resource().get())";

/// Message for a body that is not valid JSON
pub const UNPARSEABLE_BODY_MESSAGE: &str =
    "Can't parse response body. (Hint: Try the raw_body method.)";

/// A parsed response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Body(JsonValue);

impl Body {
    /// Wrap a JSON value
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Unwrap into the JSON value
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl Deref for Body {
    type Target = JsonValue;

    fn deref(&self) -> &JsonValue {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFault {
    Empty,
    Unparseable,
}

impl BodyFault {
    fn message(self) -> &'static str {
        match self {
            BodyFault::Empty => EMPTY_BODY_MESSAGE,
            BodyFault::Unparseable => UNPARSEABLE_BODY_MESSAGE,
        }
    }
}

/// An API response including body, headers, and status information
#[derive(Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    raw_body: Bytes,
    parsed: OnceCell<std::result::Result<Body, BodyFault>>,
    client: Client,
}

impl Response {
    /// Create a response
    pub fn new(status: u16, headers: HeaderMap, raw_body: Bytes, client: Client) -> Self {
        Self {
            status,
            headers,
            raw_body,
            parsed: OnceCell::new(),
            client,
        }
    }

    /// Wrap a raw transport response
    pub fn from_raw(raw: RawResponse, client: Client) -> Self {
        Self::new(raw.status, raw.headers, raw.body, client)
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A single header value, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The raw, unparsed body
    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// The raw body as text
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw_body)
    }

    /// True if the status is below 400
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// The parsed body. Parsing happens at most once.
    ///
    /// Fails with a `Body` error when the body is empty or not JSON; the two
    /// cases carry different messages.
    pub fn body(&self) -> Result<&Body> {
        let parsed = self.parsed.get_or_init(|| {
            if self.raw_body.is_empty() {
                return Err(BodyFault::Empty);
            }
            serde_json::from_slice(&self.raw_body)
                .map(Body)
                .map_err(|_| BodyFault::Unparseable)
        });

        match parsed {
            Ok(body) => Ok(body),
            Err(fault) => Err(Error::body(fault.message(), self.clone())),
        }
    }

    /// Shorthand for `body()[key]`; missing keys yield `null`
    pub fn field(&self, key: &str) -> Result<&JsonValue> {
        Ok(self.body()?.get(key).unwrap_or(&JsonValue::Null))
    }

    /// The body read as one page of a collection; see [`Page::parse`]
    pub fn page(&self) -> Result<Page> {
        Page::parse(self.body()?)
    }

    /// A resource for the `Location` header, if the response has one
    pub fn resource(&self) -> Result<Option<Resource>> {
        match self.header(LOCATION.as_str()) {
            Some(location) => Ok(Some(self.client.resource(location)?)),
            None => Ok(None),
        }
    }

    /// Turn a non-success response into a `RequestFailed` error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::request_failed(self))
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.raw_body.len())
            .finish_non_exhaustive()
    }
}
