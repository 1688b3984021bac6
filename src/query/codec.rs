//! Bracket-notation encoding and decoding

use super::value::{QueryMap, QueryValue};
use url::form_urlencoded;

/// Encode a mapping into a query string (without the leading `?`).
///
/// Keys are emitted in map order, array items in their given order. Empty
/// arrays and empty mappings produce no pairs.
pub fn encode(values: &QueryMap) -> String {
    let mut pairs = Vec::new();
    for (key, value) in values {
        encode_value(&escape(key), value, &mut pairs);
    }
    pairs.join("&")
}

fn encode_value(parent: &str, value: &QueryValue, pairs: &mut Vec<String>) {
    match value {
        QueryValue::Scalar(s) => pairs.push(format!("{parent}={}", escape(s))),
        QueryValue::Bool(b) => pairs.push(format!("{parent}={b}")),
        QueryValue::Array(items) => {
            let child = format!("{parent}[]");
            for item in items {
                encode_value(&child, item, pairs);
            }
        }
        QueryValue::Mapping(map) => {
            for (key, item) in map {
                encode_value(&format!("{parent}[{}]", escape(key)), item, pairs);
            }
        }
    }
}

fn escape(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Decode a query string (without the leading `?`) into a mapping.
///
/// `key[]` accumulates an array in encounter order, `key[sub]` nests, and a
/// plain key repeated keeps its last value.
pub fn decode(query: &str) -> QueryMap {
    let mut map = QueryMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let is_array = key.ends_with("[]");
        let segments: Vec<&str> = key
            .split(['[', ']'])
            .filter(|segment| !segment.is_empty())
            .collect();
        insert(&mut map, &segments, value.into_owned(), is_array);
    }
    map.into_iter().map(|(k, v)| (k, dehash(v))).collect()
}

fn insert(map: &mut QueryMap, segments: &[&str], value: String, is_array: bool) {
    match segments {
        [] => {}
        [leaf] => {
            let leaf = (*leaf).to_string();
            if is_array {
                let mut items = match map.remove(&leaf) {
                    Some(QueryValue::Array(items)) => items,
                    _ => Vec::new(),
                };
                items.push(QueryValue::Scalar(value));
                map.insert(leaf, QueryValue::Array(items));
            } else {
                map.insert(leaf, QueryValue::Scalar(value));
            }
        }
        [head, rest @ ..] => {
            let mut child = match map.remove(*head) {
                Some(QueryValue::Mapping(child)) => child,
                _ => QueryMap::new(),
            };
            insert(&mut child, rest, value, is_array);
            map.insert((*head).to_string(), QueryValue::Mapping(child));
        }
    }
}

/// Turn mappings keyed only by indices (`a[0]=x&a[1]=y`) into arrays.
fn dehash(value: QueryValue) -> QueryValue {
    match value {
        QueryValue::Mapping(map) => {
            let map: QueryMap = map.into_iter().map(|(k, v)| (k, dehash(v))).collect();
            let indexed: Option<Vec<(u64, QueryValue)>> = map
                .iter()
                .map(|(k, v)| k.parse::<u64>().ok().map(|i| (i, v.clone())))
                .collect();
            match indexed {
                Some(mut items) if !items.is_empty() => {
                    items.sort_by_key(|(i, _)| *i);
                    QueryValue::Array(items.into_iter().map(|(_, v)| v).collect())
                }
                _ => QueryValue::Mapping(map),
            }
        }
        other => other,
    }
}

/// Normalize caller-supplied parameters.
///
/// A key written with a trailing `[]` is stored under the bare key as an
/// array; nested mappings are normalized recursively.
pub fn normalize(values: QueryMap) -> QueryMap {
    values
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                QueryValue::Mapping(map) => QueryValue::Mapping(normalize(map)),
                other => other,
            };
            match key.strip_suffix("[]") {
                Some(bare) => {
                    let items = value.to_list();
                    (bare.to_string(), QueryValue::Array(items))
                }
                None => (key, value),
            }
        })
        .collect()
}

/// Shallow merge: every key in `incoming` replaces the same key in
/// `existing` wholesale. Arrays are replaced, never concatenated.
pub fn merge(existing: &QueryMap, incoming: QueryMap) -> QueryMap {
    let mut merged = existing.clone();
    merged.extend(normalize(incoming));
    merged
}
