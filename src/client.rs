//! API client
//!
//! A [`Client`] owns the base URI, the transport and the session state.
//! It is cheap to clone; every clone and every [`Resource`] derived from it
//! share the same underlying state.

use crate::auth::{self, AuthConfig, Credentials, SessionStore};
use crate::error::{Error, Result};
use crate::http::{HttpTransport, HttpTransportConfig, RateLimiterConfig, Transport};
use crate::resource::Resource;
use crate::uri::Uri;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Page size used by collection iteration when the caller sets none
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Client-level behavior settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Default `per_page` for collection iteration
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ClientConfig {
    /// Set the default page size
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

struct ClientInner {
    base_uri: Uri,
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    session: SessionStore,
}

/// Entry point for talking to an API
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Create a client with the default HTTP transport and no auth
    pub fn new(base_uri: &str) -> Result<Self> {
        Self::builder(base_uri).build()
    }

    /// Create a client that sends `Authorization: Bearer <token>`
    pub fn with_token(base_uri: &str, token: impl Into<String>) -> Result<Self> {
        Self::builder(base_uri).token(token).build()
    }

    /// Create a client builder
    pub fn builder(base_uri: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_uri)
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(
        base_uri: &str,
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Result<Self> {
        let base_uri = Uri::parse(base_uri)?;
        if !base_uri.is_absolute() {
            return Err(Error::invalid_uri(
                base_uri.to_string(),
                "base URI must be absolute",
            ));
        }

        debug!("Created client for {}", base_uri);
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_uri,
                transport,
                config,
                session: SessionStore::new(),
            }),
        })
    }

    /// Resource for a path or URI, resolved against the base URI.
    ///
    /// Relative paths are appended to the base; a path that already starts
    /// with the base path is not doubled.
    pub fn resource(&self, path: &str) -> Result<Resource> {
        let uri = Uri::resolve(&self.inner.base_uri, path)?;
        Ok(Resource::new(self.clone(), uri))
    }

    /// Resource for the base URI itself
    pub fn root(&self) -> Resource {
        Resource::new(self.clone(), self.inner.base_uri.clone())
    }

    /// Log in with username and password; the session cookie is kept on
    /// this client and sent with every later request.
    pub async fn auth(&self, credentials: &Credentials) -> Result<()> {
        auth::login(self, credentials).await
    }

    /// The base URI
    pub fn base_uri(&self) -> &Uri {
        &self.inner.base_uri
    }

    /// Client settings
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The transport requests go through
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Session state
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// True if both handles share the same underlying client
    pub fn same_client(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_uri", &self.inner.base_uri.to_string())
            .field("transport", &self.inner.transport)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`]
#[derive(Debug)]
pub struct ClientBuilder {
    base_uri: String,
    transport_config: HttpTransportConfig,
    auth: AuthConfig,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a new builder
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            transport_config: HttpTransportConfig::default(),
            auth: AuthConfig::None,
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Authenticate with a bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::bearer(token);
        self
    }

    /// Set the auth scheme
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Default page size for collection iteration
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.config.per_page = per_page;
        self
    }

    /// Request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = timeout;
        self
    }

    /// Connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.connect_timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport_config
            .default_headers
            .insert(key.into(), value.into());
        self
    }

    /// Skip TLS certificate verification
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.transport_config.insecure = insecure;
        self
    }

    /// Throttle outgoing requests
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.transport_config.rate_limit = Some(config);
        self
    }

    /// Log response bodies at debug level
    pub fn log_bodies(mut self, enabled: bool) -> Self {
        self.transport_config.log_bodies = enabled;
        self
    }

    /// Replace the whole transport config
    pub fn transport_config(mut self, config: HttpTransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Use a custom transport; transport settings and auth are then ignored
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::with_auth(self.transport_config, self.auth)?),
        };
        Client::with_transport(&self.base_uri, transport, self.config)
    }
}
