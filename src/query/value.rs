//! Query value types

use crate::types::JsonValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered mapping of parameter names to values.
///
/// Keys iterate in lexical order, which gives every query a single
/// canonical encoding.
pub type QueryMap = BTreeMap<String, QueryValue>;

/// A structured query parameter value
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// A plain string value
    Scalar(String),
    /// A boolean, encoded as `true`/`false`
    Bool(bool),
    /// Repeated `key[]=` values, in order
    Array(Vec<QueryValue>),
    /// Nested `key[sub]=` values
    Mapping(QueryMap),
}

impl QueryValue {
    /// Build an array value from anything convertible
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<QueryValue>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// String form of a scalar or boolean
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Scalar(s) => Some(s),
            QueryValue::Bool(true) => Some("true"),
            QueryValue::Bool(false) => Some("false"),
            _ => None,
        }
    }

    /// Items of an array value
    pub fn as_array(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a mapping value
    pub fn as_mapping(&self) -> Option<&QueryMap> {
        match self {
            QueryValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Array items as a list, or a single scalar as a one-element list
    pub fn to_list(&self) -> Vec<QueryValue> {
        match self {
            QueryValue::Array(items) => items.clone(),
            other => vec![other.clone()],
        }
    }
}

// Booleans compare equal to their string form: `Bool(true)` and
// `Scalar("true")` encode identically, and decoding only yields scalars.
impl PartialEq for QueryValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (QueryValue::Array(a), QueryValue::Array(b)) => a == b,
            (QueryValue::Mapping(a), QueryValue::Mapping(b)) => a == b,
            (a, b) => match (a.as_str(), b.as_str()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for QueryValue {}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! scalar_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_number!(i32, i64, u32, u64, usize, f64);

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

impl From<QueryMap> for QueryValue {
    fn from(map: QueryMap) -> Self {
        Self::Mapping(map)
    }
}

impl From<JsonValue> for QueryValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Scalar(String::new()),
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Scalar(n.to_string()),
            JsonValue::String(s) => Self::Scalar(s),
            JsonValue::Array(items) => Self::array(items),
            JsonValue::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, QueryValue::from(v)))
                    .collect(),
            ),
        }
    }
}
