//! Authentication module
//!
//! Supports: Bearer token, Basic, Custom Headers, and session login
//!
//! Header-based schemes are applied by the transport on every request.
//! Session login posts credentials to the API once and replays the returned
//! session cookie on subsequent requests made through the same client.

mod authenticator;
mod session;
mod types;

pub use authenticator::Authenticator;
pub use session::{login, SessionStore, LOGIN_PATH};
pub use types::{AuthConfig, Credentials};

#[cfg(test)]
mod tests;
