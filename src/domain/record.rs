//! Configuration records
//!
//! A [`ConfigRecord`] is an ordered field → value mapping read from the source
//! store. It is read once, encoded, and dropped; nothing mutates it in place.

use super::errors::SitepackError;
use super::ids::{ConfigName, FileUuid};
use super::result::Result;
use serde_yaml::{Mapping, Value};

/// Value of the `type` field that marks a package definition record
pub const PACKAGE_TYPE: &str = "site_package";

/// A named configuration record
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRecord {
    name: ConfigName,
    data: Mapping,
}

impl ConfigRecord {
    pub fn new(name: ConfigName, data: Mapping) -> Self {
        Self { name, data }
    }

    /// Parses a record from YAML text
    ///
    /// An empty document is an empty record. Anything other than a mapping
    /// at the top level is rejected.
    pub fn from_yaml(name: ConfigName, yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        match value {
            Value::Null => Ok(Self::new(name, Mapping::new())),
            Value::Mapping(data) => Ok(Self::new(name, data)),
            other => Err(SitepackError::Validation(format!(
                "Config record {name} must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn name(&self) -> &ConfigName {
        &self.name
    }

    pub fn data(&self) -> &Mapping {
        &self.data
    }

    pub fn into_parts(self) -> (ConfigName, Mapping) {
        (self.name, self.data)
    }

    /// Returns a top-level string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Value of the record's `type` field
    pub fn record_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn is_package(&self) -> bool {
        self.record_type() == Some(PACKAGE_TYPE)
    }

    /// File assets this record depends on
    ///
    /// Read from `dependencies.content`, keeping only `file:file:<uuid>`
    /// entries. Order of first appearance, duplicates removed.
    pub fn file_references(&self) -> Vec<FileUuid> {
        let content = self
            .data
            .get("dependencies")
            .and_then(|deps| deps.get("content"))
            .and_then(Value::as_sequence);

        let mut refs: Vec<FileUuid> = Vec::new();
        for dependency in content.into_iter().flatten() {
            if let Some(uuid) = dependency.as_str().and_then(FileUuid::from_dependency) {
                if !refs.contains(&uuid) {
                    refs.push(uuid);
                }
            }
        }
        refs
    }
}

/// Short human-readable name of a YAML value's shape
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
