//! One page of a collection response

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use serde::Serialize;

/// A page as returned by a collection GET: `{results, pages, total}`.
///
/// [`Page::parse`] requires a `results` array and rejects counts it cannot
/// read. [`Page::from_body`] is lenient: `results` defaults to an empty
/// list, the counts to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    /// Records on this page
    pub results: Vec<Record>,
    /// Total number of pages
    pub pages: Option<u64>,
    /// Total number of records
    pub total: Option<u64>,
}

impl Page {
    /// Read a page out of a parsed body, failing with `MissingField` when
    /// `results` is not an array or a present `pages`/`total` is not a
    /// whole non-negative number. Absent or null counts are `None`.
    pub fn parse(body: &JsonValue) -> Result<Self> {
        let results = body
            .get("results")
            .and_then(JsonValue::as_array)
            .cloned()
            .ok_or_else(|| Error::missing_field("results"))?;

        Ok(Self {
            results,
            pages: strict_count(body, "pages")?,
            total: strict_count(body, "total")?,
        })
    }

    /// Read a page out of a parsed body, ignoring anything unusable
    pub fn from_body(body: &JsonValue) -> Self {
        Self {
            results: body
                .get("results")
                .and_then(JsonValue::as_array)
                .cloned()
                .unwrap_or_default(),
            pages: body.get("pages").and_then(count),
            total: body.get("total").and_then(count),
        }
    }

    /// True if the page has no records
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn strict_count(body: &JsonValue, key: &str) -> Result<Option<u64>> {
    match body.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => count(value).map(Some).ok_or_else(|| Error::missing_field(key)),
    }
}

// Counts arrive as integers, sometimes as `3.0` or numeric strings
fn count(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod page_tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_from_body() {
        let page = Page::from_body(&json!({
            "results": [{"id": 1}, {"id": 2}],
            "pages": 3,
            "total": 41
        }));
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.pages, Some(3));
        assert_eq!(page.total, Some(41));
        assert!(!page.is_empty());
    }

    #[test]
    fn test_from_body_lenient() {
        let page = Page::from_body(&json!({"results": null, "pages": "2"}));
        assert!(page.is_empty());
        assert_eq!(page.pages, Some(2));
        assert_eq!(page.total, None);

        assert_eq!(Page::from_body(&json!([])), Page::default());
    }

    #[test]
    fn test_parse_whole_float_counts() {
        let page = Page::parse(&json!({"results": [], "pages": 3.0, "total": 60.0})).unwrap();
        assert_eq!(page.pages, Some(3));
        assert_eq!(page.total, Some(60));

        let page = Page::parse(&json!({"results": [], "pages": null})).unwrap();
        assert_eq!(page.pages, None);
        assert_eq!(page.total, None);
    }

    #[test]
    fn test_parse_rejects_unusable_fields() {
        let err = Page::parse(&json!({"data": [{"id": 1}], "pages": 1})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.to_string().contains("'results'"));

        let err = Page::parse(&json!({"results": {"id": 1}})).unwrap_err();
        assert!(err.to_string().contains("'results'"));

        let err = Page::parse(&json!({"results": [], "pages": "many"})).unwrap_err();
        assert!(err.to_string().contains("'pages'"));

        let err = Page::parse(&json!({"results": [], "total": 2.5})).unwrap_err();
        assert!(err.to_string().contains("'total'"));
    }
}
