//! Error types for the resource client
//!
//! Every public API returns `Result<T, Error>`. Request failures carry the
//! [`Response`] that caused them so callers can inspect status and body.

use crate::response::Response;
use thiserror::Error;

/// The main error type for the resource client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Failures
    // ============================================================================
    /// A checked request returned a non-success status
    #[error("{message}")]
    RequestFailed {
        message: String,
        response: Box<Response>,
    },

    /// An explicit authentication step was rejected
    #[error("{message}")]
    AuthFailed {
        message: String,
        response: Option<Box<Response>>,
    },

    /// The response body could not be parsed
    #[error("{message}")]
    Body {
        message: String,
        response: Box<Response>,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid URI '{uri}': {message}")]
    InvalidUri { uri: String, message: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Response body has no usable '{field}' field")]
    MissingField { field: String },

    #[error("Collection at {uri} returned no results")]
    EmptyCollection { uri: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Discriminant of [`Error`], for matching without destructuring payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RequestFailed,
    AuthFailed,
    Body,
    Transport,
    InvalidUri,
    Json,
    MissingField,
    EmptyCollection,
    Config,
    Io,
    Other,
}

impl Error {
    /// Create a request failure for a non-success response
    pub fn request_failed(response: Response) -> Self {
        Self::RequestFailed {
            message: format!("Request failed with status: {}", response.status()),
            response: Box::new(response),
        }
    }

    /// Create a request failure with a custom message
    pub fn request_failed_with(message: impl Into<String>, response: Response) -> Self {
        Self::RequestFailed {
            message: message.into(),
            response: Box::new(response),
        }
    }

    /// Create an auth failure
    pub fn auth_failed(message: impl Into<String>, response: Option<Response>) -> Self {
        Self::AuthFailed {
            message: message.into(),
            response: response.map(Box::new),
        }
    }

    /// Create a body error
    pub fn body(message: impl Into<String>, response: Response) -> Self {
        Self::Body {
            message: message.into(),
            response: Box::new(response),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an invalid URI error
    pub fn invalid_uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RequestFailed { .. } => ErrorKind::RequestFailed,
            Error::AuthFailed { .. } => ErrorKind::AuthFailed,
            Error::Body { .. } => ErrorKind::Body,
            Error::Http(_) | Error::Transport { .. } => ErrorKind::Transport,
            Error::InvalidUrl(_) | Error::InvalidUri { .. } => ErrorKind::InvalidUri,
            Error::JsonParse(_) => ErrorKind::Json,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::EmptyCollection { .. } => ErrorKind::EmptyCollection,
            Error::Config { .. } | Error::YamlParse(_) => ErrorKind::Config,
            Error::Io(_) | Error::FileNotFound { .. } => ErrorKind::Io,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// True for `RequestFailed` and its specializations (`AuthFailed`, `Body`)
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RequestFailed | ErrorKind::AuthFailed | ErrorKind::Body
        )
    }

    /// The response carried by a request failure, if any
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::RequestFailed { response, .. } | Error::Body { response, .. } => Some(response),
            Error::AuthFailed { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the carried response, if any
    pub fn status(&self) -> Option<u16> {
        self.response().map(Response::status)
    }
}

/// Result type alias for the resource client
pub type Result<T> = std::result::Result<T, Error>;
