//! Tests for the auth module

use super::*;
use crate::client::Client;
use crate::error::ErrorKind;
use std::collections::HashMap;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_bearer_auth() {
    let auth = Authenticator::new(AuthConfig::bearer("my-token"));
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-token"
    );
}

#[test]
fn test_basic_auth() {
    let auth = Authenticator::new(AuthConfig::Basic {
        username: "user".to_string(),
        password: "pass".to_string(),
    });
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    // "user:pass" in base64
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Basic dXNlcjpwYXNz"
    );
}

#[test]
fn test_custom_headers() {
    let mut headers = HashMap::new();
    headers.insert("X-Custom-Auth".to_string(), "custom-value".to_string());
    headers.insert("X-Tenant".to_string(), "acme".to_string());

    let auth = Authenticator::new(AuthConfig::CustomHeaders { headers });
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert_eq!(built.headers().get("X-Custom-Auth").unwrap(), "custom-value");
    assert_eq!(built.headers().get("X-Tenant").unwrap(), "acme");
}

#[test]
fn test_auth_config_deserialize() {
    let yaml = r#"
type: bearer
token: abc123
"#;
    let config: AuthConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config, AuthConfig::bearer("abc123"));

    let yaml = r#"
type: basic
username: admin
password: hunter2
"#;
    let config: AuthConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.scheme(), "basic");
}

#[test]
fn test_debug_redacts_secrets() {
    let bearer = format!("{:?}", AuthConfig::bearer("super-secret"));
    assert!(!bearer.contains("super-secret"));

    let basic = format!(
        "{:?}",
        AuthConfig::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        }
    );
    assert!(basic.contains("admin"));
    assert!(!basic.contains("hunter2"));

    let credentials = Credentials::new("admin", "hunter2").unwrap();
    assert!(!format!("{credentials:?}").contains("hunter2"));
}

#[test]
fn test_credentials_require_both_parts() {
    assert!(Credentials::new("admin", "hunter2").is_ok());

    let err = Credentials::new("", "hunter2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("Must specify username and password"));

    assert!(Credentials::new("admin", "").is_err());
}

#[tokio::test]
async fn test_session_store() {
    let store = SessionStore::new();
    assert!(store.cookie().await.is_none());

    store.set(Some("session=abc".to_string())).await;
    assert_eq!(store.cookie().await.as_deref(), Some("session=abc"));

    store.clear().await;
    assert!(store.cookie().await.is_none());
}

#[tokio::test]
async fn test_login_stores_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/identity/callback"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("auth_key=admin&password=p%40ss+word"))
        .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", "session=abc123"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&format!("{}/api", server.uri())).unwrap();
    let credentials = Credentials::new("admin", "p@ss word").unwrap();

    client.auth(&credentials).await.unwrap();
    assert_eq!(
        client.session().cookie().await.as_deref(),
        Some("session=abc123")
    );
}

#[tokio::test]
async fn test_session_cookie_sent_on_later_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api{LOGIN_PATH}")))
        .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", "session=abc123"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/widgets"))
        .and(header("Cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&format!("{}/api", server.uri())).unwrap();
    client
        .auth(&Credentials::new("admin", "secret").unwrap())
        .await
        .unwrap();

    let response = client.resource("widgets").unwrap().get().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_login_joins_every_set_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/api{LOGIN_PATH}")))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "a=1; Path=/")
                .append_header("Set-Cookie", "b=2; HttpOnly"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/widgets"))
        .and(header("Cookie", "a=1; b=2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&format!("{}/api", server.uri())).unwrap();
    client
        .auth(&Credentials::new("admin", "secret").unwrap())
        .await
        .unwrap();

    assert_eq!(client.session().cookie().await.as_deref(), Some("a=1; b=2"));
    let response = client.resource("widgets").unwrap().get().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/identity/callback"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = Client::new(&format!("{}/api", server.uri())).unwrap();
    let err = client
        .auth(&Credentials::new("admin", "wrong").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthFailed);
    assert_eq!(err.status(), Some(401));
    assert!(err.is_request_failure());
    assert!(client.session().cookie().await.is_none());
}
