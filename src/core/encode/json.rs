//! Best-effort JSON pretty printing for embedded JSON strings

use serde_json::Value;

/// Re-serializes a JSON document with two-space indentation
///
/// Key order is kept. Input that does not parse as JSON is returned
/// unchanged; parse failures are never reported.
///
/// # Examples
///
/// ```
/// use sitepack::core::encode::pretty_print_json;
///
/// assert_eq!(pretty_print_json(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
/// assert_eq!(pretty_print_json("not json"), "not json");
/// ```
pub fn pretty_print_json(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
