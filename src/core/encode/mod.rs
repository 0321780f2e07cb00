//! Record encoding
//!
//! Turns a [`ConfigRecord`] into the canonical YAML text stored in the
//! archive or written to a sync directory. Encoding is pure: the same record,
//! including its key order, always encodes to the same bytes.
//!
//! Before serialization the string fields `json_values` and `json_mapper`,
//! and `settings` on package definitions, are re-indented as multi-line JSON
//! so they land in the output as literal blocks that diff line by line.

pub mod json;

pub use json::pretty_print_json;

use crate::domain::record::value_kind;
use crate::domain::{ConfigRecord, Result, SitepackError};
use serde_yaml::{Mapping, Value};

/// Top-level fields that always hold serialized JSON
const JSON_FIELDS: [&str; 2] = ["json_values", "json_mapper"];

/// Package field holding serialized JSON
const PACKAGE_SETTINGS_FIELD: &str = "settings";

/// Encodes configuration records as YAML
#[derive(Debug, Clone, Default)]
pub struct RecordEncoder;

impl RecordEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes one record
    ///
    /// # Errors
    ///
    /// Returns [`SitepackError::Encoding`] when the record holds a tagged
    /// value or a non-scalar mapping key, naming the offending field path.
    pub fn encode(&self, record: &ConfigRecord) -> Result<String> {
        let name = record.name().as_str();
        check_representable(name, record.data(), "")?;

        let data = normalize_json_fields(record.data(), record.is_package());
        serde_yaml::to_string(&data).map_err(|e| SitepackError::encoding(name, e.to_string()))
    }
}

/// Applies the JSON pretty-printing rules to a copy of the record's fields
fn normalize_json_fields(data: &Mapping, is_package: bool) -> Mapping {
    let mut out = Mapping::with_capacity(data.len());
    for (key, value) in data {
        let field = key.as_str().unwrap_or_default();
        let is_json_field = JSON_FIELDS.contains(&field)
            || (is_package && field == PACKAGE_SETTINGS_FIELD);

        let value = match value {
            Value::String(raw) if is_json_field => Value::String(pretty_print_json(raw)),
            other => other.clone(),
        };
        out.insert(key.clone(), value);
    }
    out
}

fn check_representable(name: &str, mapping: &Mapping, path: &str) -> Result<()> {
    for (key, value) in mapping {
        let key_text = match key {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "~".to_string(),
            other => {
                return Err(SitepackError::encoding(
                    name,
                    format!(
                        "non-scalar mapping key ({}) at {}",
                        value_kind(other),
                        display_path(path)
                    ),
                ));
            }
        };
        let child = join_path(path, &key_text);
        check_value(name, value, &child)?;
    }
    Ok(())
}

fn check_value(name: &str, value: &Value, path: &str) -> Result<()> {
    match value {
        Value::Tagged(tagged) => Err(SitepackError::encoding(
            name,
            format!("unsupported tagged value {} at {}", tagged.tag, display_path(path)),
        )),
        Value::Mapping(mapping) => check_representable(name, mapping, path),
        Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                check_value(name, item, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
