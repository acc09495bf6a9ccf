//! Removal of keys that a document store would interpret as query operators
//! (`$gt`, `$where`, ...) or as nested paths (`profile.role`).

use serde_json::Value;

pub fn is_dangerous_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Drops every dangerous key, at any depth, together with its value.
/// Objects and arrays are descended into; primitives pass through.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !is_dangerous_key(key))
                .map(|(key, value)| (key, sanitize(value)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(sanitize).collect()),
        primitive => primitive,
    }
}

/// Query keys may use bracket syntax (`filter[$ne]`), in which case every
/// segment is checked.
pub fn is_dangerous_query_key(key: &str) -> bool {
    key.split(['[', ']'])
        .filter(|segment| !segment.is_empty())
        .any(is_dangerous_key)
}

/// Returns the query string without dangerous pairs, or `None` when no pair
/// survives. Unparseable query strings are returned as-is.
pub fn sanitize_query(query: &str) -> Option<String> {
    let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(query) else {
        return Some(query.to_string());
    };
    let kept: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(key, _)| !is_dangerous_query_key(key))
        .collect();
    if kept.is_empty() {
        return None;
    }
    serde_urlencoded::to_string(&kept).ok()
}
