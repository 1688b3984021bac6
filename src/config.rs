//! Client settings
//!
//! Settings describe how to reach one API: base URL, credentials, page size
//! and transport options. They are read from a YAML file (JSON works too,
//! being a YAML subset) and can be overridden field by field.
//!
//! ```yaml
//! base_url: https://api.example.com/api/v1
//! token: secret
//! per_page: 50
//! timeout_secs: 30
//! rate_limit:
//!   requests_per_second: 5
//! ```

use crate::auth::AuthConfig;
use crate::client::{Client, ClientBuilder};
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Settings for building a [`Client`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token; shorthand for `auth: {type: bearer, token: ...}`
    #[serde(default)]
    pub token: Option<String>,

    /// Authentication scheme, used when no token is given
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Default page size for collection iteration
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Connection timeout in seconds
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Log response bodies at debug level
    #[serde(default)]
    pub log_bodies: bool,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

impl Settings {
    /// Parse settings from YAML (or JSON) text
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load settings from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        debug!("Loaded settings from {}", path.display());
        Self::from_yaml(&text)
            .map_err(|e| Error::config(format!("Invalid settings file {}: {e}", path.display())))
    }

    /// Overlay `overrides` on these settings. Set fields in `overrides` win;
    /// flags are or-ed; headers are merged.
    #[must_use]
    pub fn merge(mut self, overrides: Settings) -> Self {
        self.base_url = overrides.base_url.or(self.base_url);
        self.token = overrides.token.or(self.token);
        self.auth = overrides.auth.or(self.auth);
        self.per_page = overrides.per_page.or(self.per_page);
        self.timeout_secs = overrides.timeout_secs.or(self.timeout_secs);
        self.connect_timeout_secs = overrides.connect_timeout_secs.or(self.connect_timeout_secs);
        self.insecure |= overrides.insecure;
        self.rate_limit = overrides.rate_limit.or(self.rate_limit);
        self.log_bodies |= overrides.log_bodies;
        self.headers.extend(overrides.headers);
        self
    }

    /// The effective auth scheme
    pub fn auth_config(&self) -> AuthConfig {
        match (&self.token, &self.auth) {
            (Some(token), _) => AuthConfig::bearer(token.clone()),
            (None, Some(auth)) => auth.clone(),
            (None, None) => AuthConfig::None,
        }
    }

    /// A client builder populated from these settings
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::config("No base URL configured"))?;

        let mut builder = Client::builder(base_url)
            .auth(self.auth_config())
            .insecure(self.insecure)
            .log_bodies(self.log_bodies);

        if let Some(per_page) = self.per_page {
            if per_page == 0 {
                return Err(Error::config("per_page must be at least 1"));
            }
            builder = builder.per_page(per_page);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(ref rate_limit) = self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        for (key, value) in &self.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        Ok(builder)
    }

    /// Build a client from these settings
    pub fn build_client(&self) -> Result<Client> {
        self.client_builder()?.build()
    }
}
