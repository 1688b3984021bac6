//! Common types used throughout the resource client
//!
//! Shared type aliases and the HTTP method enum used by the transport seam.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A single record from a collection. Passed through unmodified.
pub type Record = JsonValue;

/// Generic key-value map with string keys and values (request headers)
pub type StringMap = HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    HEAD,
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::HEAD => reqwest::Method::HEAD,
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::HEAD => "HEAD",
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

/// Request body accepted by `put`/`post`
///
/// JSON bodies are serialized by the transport; raw bodies are sent verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON
    Json(JsonValue),
    /// Sent as-is
    Raw(String),
}

impl RequestBody {
    /// Render the body to the bytes that go on the wire
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        match self {
            RequestBody::Json(value) => Ok(serde_json::to_vec(value)?),
            RequestBody::Raw(text) => Ok(text.clone().into_bytes()),
        }
    }
}

impl From<JsonValue> for RequestBody {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::HEAD), reqwest::Method::HEAD);
        assert_eq!(reqwest::Method::from(Method::DELETE), reqwest::Method::DELETE);
        assert_eq!(Method::default(), Method::GET);
        assert_eq!(Method::POST.to_string(), "POST");
    }

    #[test]
    fn test_request_body_bytes() {
        let body = RequestBody::from(json!({"key1": "val1"}));
        assert_eq!(body.to_bytes().unwrap(), br#"{"key1":"val1"}"#.to_vec());

        let body = RequestBody::from("auth_key=coco");
        assert_eq!(body.to_bytes().unwrap(), b"auth_key=coco".to_vec());
    }
}
