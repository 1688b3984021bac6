//! Filter, sort, field-selection and embed combinators

use super::Resource;
use crate::error::{Error, Result};
use crate::query::QueryValue;
use crate::types::JsonValue;

/// Query parameter holding the JSON-encoded filter expression
pub const FILTER_PARAM: &str = "_filter";

/// Query parameter holding the sort fields
pub const SORT_PARAM: &str = "sort";

/// Query parameter holding the selected fields
pub const ONLY_PARAM: &str = "_only";

/// Query parameter holding embedded sub-resources
pub const INCLUDE_PARAM: &str = "_include";

/// A filter expression, either structured or as JSON text
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A structured value
    Value(JsonValue),
    /// JSON text, parsed before use
    Json(String),
}

impl Filter {
    fn into_value(self) -> Result<JsonValue> {
        match self {
            Filter::Value(value) => Ok(value),
            Filter::Json(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

impl From<JsonValue> for Filter {
    fn from(value: JsonValue) -> Self {
        Filter::Value(value)
    }
}

impl From<&str> for Filter {
    fn from(text: &str) -> Self {
        Filter::Json(text.to_string())
    }
}

impl From<String> for Filter {
    fn from(text: String) -> Self {
        Filter::Json(text)
    }
}

impl Resource {
    /// Add a filter expression.
    ///
    /// The first filter is stored as-is. Adding a second wraps both in an
    /// array and later filters are appended to it. Fails if a string filter
    /// is not valid JSON.
    pub fn filter(&self, filter: impl Into<Filter>) -> Result<Self> {
        let incoming = filter.into().into_value()?;

        let combined = match self.query_values().get(FILTER_PARAM) {
            None => incoming,
            Some(existing) => {
                let text = existing.as_str().ok_or_else(|| {
                    Error::invalid_uri(
                        self.uri().to_string(),
                        format!("'{FILTER_PARAM}' must hold a JSON string"),
                    )
                })?;
                match serde_json::from_str(text)? {
                    JsonValue::Array(mut filters) => {
                        filters.push(incoming);
                        JsonValue::Array(filters)
                    }
                    previous => JsonValue::Array(vec![previous, incoming]),
                }
            }
        };

        Ok(self.query([(FILTER_PARAM, serde_json::to_string(&combined)?)]))
    }

    /// Sort by `fields`, replacing any earlier sort
    #[must_use]
    pub fn sort<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query([(SORT_PARAM, string_array(fields))])
    }

    /// Return only `fields`, replacing any earlier selection
    #[must_use]
    pub fn only<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query([(ONLY_PARAM, string_array(fields))])
    }

    /// Embed the named sub-resources, in addition to any already embedded
    #[must_use]
    pub fn embed<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut included = self
            .query_values()
            .get(INCLUDE_PARAM)
            .map(QueryValue::to_list)
            .unwrap_or_default();
        included.extend(names.into_iter().map(|name| QueryValue::Scalar(name.into())));

        self.query([(INCLUDE_PARAM, QueryValue::Array(included))])
    }
}

fn string_array<I, S>(items: I) -> QueryValue
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    QueryValue::array(items.into_iter().map(Into::<String>::into))
}
