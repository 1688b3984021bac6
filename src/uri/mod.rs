//! Immutable URI values
//!
//! A [`Uri`] is a scheme/host/path plus a decoded query mapping. Every
//! operation returns a new value; nothing is mutated in place. Two URIs are
//! equal when their normalized string forms are equal.
//!
//! Sub-path segments are appended verbatim, without percent-encoding, so
//! callers can address paths containing literal characters. Encoding for
//! the wire happens when the transport parses the final URL.

use crate::error::{Error, Result};
use crate::query::{self, QueryMap};
use std::fmt;

/// An immutable, possibly relative URI
#[derive(Debug, Clone, Default)]
pub struct Uri {
    scheme: Option<String>,
    host: Option<String>,
    path: String,
    query: QueryMap,
}

impl Uri {
    /// Parse an absolute (`https://host/path?q`) or relative (`/path?q`) URI.
    ///
    /// Fragments are discarded.
    pub fn parse(input: &str) -> Result<Self> {
        let without_fragment = input.split('#').next().unwrap_or_default();
        let (target, query_string) = match without_fragment.split_once('?') {
            Some((target, query_string)) => (target, query_string),
            None => (without_fragment, ""),
        };

        let mut uri = Uri {
            query: query::decode(query_string),
            ..Default::default()
        };

        match target.split_once("://") {
            Some((scheme, rest)) => {
                let (host, path) = match rest.find('/') {
                    Some(idx) => rest.split_at(idx),
                    None => (rest, ""),
                };
                if host.is_empty() {
                    return Err(Error::invalid_uri(input, "missing host"));
                }
                // Validates scheme and authority syntax
                url::Url::parse(&format!("{scheme}://{host}"))?;
                uri.scheme = Some(scheme.to_ascii_lowercase());
                uri.host = Some(host.to_string());
                uri.path = path.to_string();
            }
            None => uri.path = target.to_string(),
        }

        Ok(uri)
    }

    /// Resolve `input` against a base URI.
    ///
    /// A redundant base prefix is stripped so that `"{base}/sub"`,
    /// `"{base.path}/sub"`, `"/sub"` and `"sub"` all resolve to the same URI.
    /// Absolute URIs on another origin are returned as parsed.
    pub fn resolve(base: &Uri, input: &str) -> Result<Self> {
        let base_root = base.without_query().to_string();
        let base_root = base_root.trim_end_matches('/');

        if strip_at_boundary(input, base_root).is_some() {
            return Uri::parse(input);
        }

        let parsed = Uri::parse(input)?;
        if parsed.is_absolute() {
            return Ok(parsed);
        }

        let relative = format!("/{}", input.trim_start_matches('/'));
        let base_path = base.path.trim_end_matches('/');
        let relative = if base_path.is_empty() {
            relative.as_str()
        } else {
            strip_at_boundary(&relative, base_path).unwrap_or(relative.as_str())
        };

        Uri::parse(&format!("{}{base_path}{relative}", base.origin()))
    }

    /// Returns a new URI with `segment` appended to the path, separated by
    /// exactly one `/`.
    #[must_use]
    pub fn subpath(&self, segment: &str) -> Self {
        let mut uri = self.clone();
        if !uri.path.ends_with('/') {
            uri.path.push('/');
        }
        uri.path.push_str(segment.trim_start_matches('/'));
        uri
    }

    /// Returns a new URI whose query is the current query merged with
    /// `values`. Keys in `values` replace existing keys wholesale.
    #[must_use]
    pub fn merge_query_values(&self, values: QueryMap) -> Self {
        Self {
            query: query::merge(&self.query, values),
            ..self.clone()
        }
    }

    /// Returns a new URI with the query replaced by `values`
    #[must_use]
    pub fn with_query_values(&self, values: QueryMap) -> Self {
        Self {
            query: query::normalize(values),
            ..self.clone()
        }
    }

    /// Returns a new URI without any query
    #[must_use]
    pub fn without_query(&self) -> Self {
        self.with_query_values(QueryMap::new())
    }

    /// Decoded query parameters (empty if none)
    pub fn query_values(&self) -> &QueryMap {
        &self.query
    }

    /// Encoded query string, if the URI has any parameters
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else {
            Some(query::encode(&self.query))
        }
    }

    /// The path component
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The scheme, for absolute URIs
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// The host (with port, if any), for absolute URIs
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// True when the URI has a scheme and host
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some() && self.host.is_some()
    }

    /// `scheme://host`, or an empty string for relative URIs
    pub fn origin(&self) -> String {
        match (&self.scheme, &self.host) {
            (Some(scheme), Some(host)) => format!("{scheme}://{host}"),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.path)?;
        if let Some(query) = self.query_string() {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Uri {}

impl std::str::FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uri::parse(s)
    }
}

/// Strip `prefix` from `input` only if it ends at a path boundary.
fn strip_at_boundary<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
        Some(rest)
    } else {
        None
    }
}
