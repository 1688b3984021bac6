//! Resources
//!
//! A [`Resource`] is an immutable handle on one addressable collection or
//! item: a [`Uri`] plus the [`Client`] it was derived from. Combinators
//! such as [`Resource::query`] or [`Resource::filter`] return new
//! resources and never perform I/O. HTTP verbs delegate to the client's
//! transport.
//!
//! # Example
//!
//! ```no_run
//! use resource_client::Client;
//! use serde_json::json;
//!
//! # async fn run() -> resource_client::Result<()> {
//! let client = Client::with_token("https://api.example.com/api/v1", "secret")?;
//! let open = client
//!     .resource("tickets")?
//!     .filter(json!({"status": "open"}))?
//!     .sort(["created_at,desc"])
//!     .embed(["customer"]);
//!
//! println!("{} open tickets", open.count().await?);
//! # Ok(())
//! # }
//! ```

mod params;

pub use params::{Filter, FILTER_PARAM, INCLUDE_PARAM, ONLY_PARAM, SORT_PARAM};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::{Transport, TransportRequest};
use crate::query::{QueryMap, QueryValue};
use crate::response::Response;
use crate::types::{Method, RequestBody, StringMap};
use crate::uri::Uri;
use reqwest::header::COOKIE;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Message raised by [`Resource::exists`] for statuses other than success
/// and 404
pub const EXISTS_FAILURE_MESSAGE: &str =
    "Request during call to 'exists' resulted in non-404 error.";

/// An immutable, chainable handle on an API resource
#[derive(Clone)]
pub struct Resource {
    uri: Uri,
    client: Client,
}

impl Resource {
    /// Create a resource for `uri` on `client`
    pub fn new(client: Client, uri: Uri) -> Self {
        Self { uri, client }
    }

    /// The resource's URI
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The client this resource was derived from
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The shared transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        self.client.transport()
    }

    /// A resource for `uri` on the same client
    #[must_use]
    pub fn with_uri(&self, uri: Uri) -> Self {
        Self::new(self.client.clone(), uri)
    }

    // ========================================================================
    // Combinators
    // ========================================================================

    /// A sub-resource one path segment below this one. The query is kept.
    #[must_use]
    pub fn index(&self, segment: impl fmt::Display) -> Self {
        self.with_uri(self.uri.subpath(&segment.to_string()))
    }

    /// Alias for [`Resource::index`]
    #[must_use]
    pub fn subpath(&self, segment: impl fmt::Display) -> Self {
        self.index(segment)
    }

    /// A resource with `params` merged into the query. Each given key
    /// replaces any existing value for that key.
    #[must_use]
    pub fn query<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        let values: QueryMap = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_uri(self.uri.merge_query_values(values))
    }

    /// The decoded query mapping; empty if there is none
    pub fn query_values(&self) -> &QueryMap {
        self.uri.query_values()
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    /// Send a request to this resource. Any completed exchange is returned
    /// as a [`Response`], whatever its status.
    pub async fn request(
        &self,
        method: Method,
        body: Option<RequestBody>,
        headers: &StringMap,
    ) -> Result<Response> {
        let mut request = TransportRequest::new(method, self.uri.to_string());
        request.headers = headers.clone();
        request.body = body;

        if let Some(cookie) = self.client.session().cookie().await {
            request
                .headers
                .entry(COOKIE.to_string())
                .or_insert(cookie);
        }

        let raw = self.transport().perform_request(request).await?;
        debug!("{} {} -> {}", method, self.uri, raw.status);
        Ok(Response::from_raw(raw, self.client.clone()))
    }

    /// Like [`Resource::request`] but fails with `RequestFailed` on any
    /// status of 400 or above
    pub async fn request_checked(
        &self,
        method: Method,
        body: Option<RequestBody>,
        headers: &StringMap,
    ) -> Result<Response> {
        self.request(method, body, headers).await?.error_for_status()
    }

    /// HEAD
    pub async fn head(&self) -> Result<Response> {
        self.head_with(&StringMap::new()).await
    }

    /// HEAD with extra headers
    pub async fn head_with(&self, headers: &StringMap) -> Result<Response> {
        self.request(Method::HEAD, None, headers).await
    }

    /// HEAD, failing on error statuses
    pub async fn head_checked(&self) -> Result<Response> {
        self.request_checked(Method::HEAD, None, &StringMap::new())
            .await
    }

    /// GET
    pub async fn get(&self) -> Result<Response> {
        self.get_with(&StringMap::new()).await
    }

    /// GET with extra headers
    pub async fn get_with(&self, headers: &StringMap) -> Result<Response> {
        self.request(Method::GET, None, headers).await
    }

    /// GET, failing on error statuses
    pub async fn get_checked(&self) -> Result<Response> {
        self.request_checked(Method::GET, None, &StringMap::new())
            .await
    }

    /// DELETE
    pub async fn delete(&self) -> Result<Response> {
        self.delete_with(&StringMap::new()).await
    }

    /// DELETE with extra headers
    pub async fn delete_with(&self, headers: &StringMap) -> Result<Response> {
        self.request(Method::DELETE, None, headers).await
    }

    /// DELETE, failing on error statuses
    pub async fn delete_checked(&self) -> Result<Response> {
        self.request_checked(Method::DELETE, None, &StringMap::new())
            .await
    }

    /// PUT. JSON values are serialized; strings are sent as-is.
    pub async fn put(&self, body: impl Into<RequestBody>) -> Result<Response> {
        self.put_with(body, &StringMap::new()).await
    }

    /// PUT with extra headers
    pub async fn put_with(
        &self,
        body: impl Into<RequestBody>,
        headers: &StringMap,
    ) -> Result<Response> {
        self.request(Method::PUT, Some(body.into()), headers).await
    }

    /// PUT, failing on error statuses
    pub async fn put_checked(&self, body: impl Into<RequestBody>) -> Result<Response> {
        self.request_checked(Method::PUT, Some(body.into()), &StringMap::new())
            .await
    }

    /// POST. JSON values are serialized; strings are sent as-is.
    pub async fn post(&self, body: impl Into<RequestBody>) -> Result<Response> {
        self.post_with(body, &StringMap::new()).await
    }

    /// POST with extra headers
    pub async fn post_with(
        &self,
        body: impl Into<RequestBody>,
        headers: &StringMap,
    ) -> Result<Response> {
        self.request(Method::POST, Some(body.into()), headers).await
    }

    /// POST, failing on error statuses
    pub async fn post_checked(&self, body: impl Into<RequestBody>) -> Result<Response> {
        self.request_checked(Method::POST, Some(body.into()), &StringMap::new())
            .await
    }

    /// True on a success status, false on 404.
    ///
    /// Any other status fails with `RequestFailed`, so "does not exist" is
    /// never confused with "could not tell".
    pub async fn exists(&self) -> Result<bool> {
        let response = self.head().await?;
        if response.is_success() {
            Ok(true)
        } else if response.status() == 404 {
            Ok(false)
        } else {
            Err(Error::request_failed_with(EXISTS_FAILURE_MESSAGE, response))
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("uri", &self.uri.to_string())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}
