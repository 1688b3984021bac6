//! Session login
//!
//! Posts form-encoded credentials to the login endpoint and keeps the
//! returned session cookie for later requests.

use super::types::Credentials;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::StringMap;
use reqwest::header::{HeaderMap, CONTENT_TYPE, SET_COOKIE};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Login endpoint, relative to the client's base URI
pub const LOGIN_PATH: &str = "/auth/identity/callback";

/// Session cookie shared by every resource of a client
#[derive(Debug, Default)]
pub struct SessionStore {
    cookie: RwLock<Option<String>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session cookie, if logged in
    pub async fn cookie(&self) -> Option<String> {
        self.cookie.read().await.clone()
    }

    /// Replace the session cookie
    pub async fn set(&self, cookie: Option<String>) {
        *self.cookie.write().await = cookie;
    }

    /// Forget the session
    pub async fn clear(&self) {
        self.set(None).await;
    }
}

/// Log in with username and password.
///
/// On success the `name=value` pairs of every `Set-Cookie` header are stored
/// on the client as one `Cookie` value. Any non-success status fails with
/// `AuthFailed` carrying the response.
pub async fn login(client: &Client, credentials: &Credentials) -> Result<()> {
    let form = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("auth_key", credentials.username())
        .append_pair("password", credentials.password())
        .finish();

    let mut headers = StringMap::new();
    headers.insert(
        CONTENT_TYPE.to_string(),
        "application/x-www-form-urlencoded".to_string(),
    );

    let response = client
        .resource(LOGIN_PATH)?
        .post_with(form, &headers)
        .await?;

    if !response.is_success() {
        warn!(
            "Login as {} rejected with status {}",
            credentials.username(),
            response.status()
        );
        return Err(Error::auth_failed("Authentication failed", Some(response)));
    }

    let cookie = session_cookie(response.headers());
    if cookie.is_none() {
        warn!("Login succeeded but no session cookie was returned");
    }
    client.session().set(cookie).await;

    info!("Authenticated as {}", credentials.username());
    Ok(())
}

/// Join the `name=value` part of each `Set-Cookie` into a `Cookie` value
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    (!pairs.is_empty()).then(|| pairs.join("; "))
}
