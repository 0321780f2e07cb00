//! Package definitions
//!
//! A package is a configuration record named `sitepack.package.<id>` whose
//! `settings` field holds a JSON object keyed by member identifier:
//!
//! ```json
//! {
//!   "cohesion_elements.component.hero": {
//!     "kind": "config",
//!     "dependencies": ["system.site", "4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a"]
//!   }
//! }
//! ```

use super::entry::{Entry, EntryKind};
use super::errors::SitepackError;
use super::ids::PackageId;
use super::record::ConfigRecord;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One member of a package and what it pulls in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMember {
    pub kind: EntryKind,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A parsed package definition
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDefinition {
    pub id: PackageId,
    pub label: String,
    /// Members in the order the settings list them
    pub members: Vec<(String, PackageMember)>,
}

impl PackageDefinition {
    /// Parses the definition out of its configuration record
    ///
    /// `settings` may be a JSON string (the stored form) or an inline mapping.
    pub fn from_record(id: PackageId, record: &ConfigRecord) -> Result<Self> {
        if !record.is_package() {
            return Err(SitepackError::Validation(format!(
                "{} is not a package definition (type: {})",
                record.name(),
                record.record_type().unwrap_or("<none>")
            )));
        }

        let label = record.get_str("label").unwrap_or(id.as_str()).to_string();

        let settings: serde_json::Value = match record.data().get("settings") {
            None | Some(serde_yaml::Value::Null) => serde_json::Value::Object(Default::default()),
            Some(serde_yaml::Value::String(raw)) => serde_json::from_str(raw).map_err(|e| {
                SitepackError::Validation(format!("Package {id} has malformed settings: {e}"))
            })?,
            Some(other) => serde_json::to_value(other)?,
        };

        let object = settings.as_object().ok_or_else(|| {
            SitepackError::Validation(format!("Package {id} settings must be a JSON object"))
        })?;

        let mut members = Vec::with_capacity(object.len());
        for (key, value) in object {
            let member: PackageMember = serde_json::from_value(value.clone()).map_err(|e| {
                SitepackError::Validation(format!("Package {id} member '{key}' is invalid: {e}"))
            })?;
            members.push((key.clone(), member));
        }

        Ok(Self { id, label, members })
    }

    /// Every entry the package covers, including its own definition record
    ///
    /// Unsorted and possibly with duplicates; the resolver orders them.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        let mut entries = BTreeSet::new();
        entries.insert(Entry::classify(&self.id.config_name()).map_err(SitepackError::Validation)?);

        for (identifier, member) in &self.members {
            let entry = Entry::classify(identifier).map_err(SitepackError::Validation)?;
            if entry.kind() != member.kind {
                return Err(SitepackError::Validation(format!(
                    "Package {} member '{identifier}' declared as {} but is a {} identifier",
                    self.id,
                    member.kind,
                    entry.kind()
                )));
            }
            entries.insert(entry);

            for dependency in &member.dependencies {
                entries.insert(Entry::classify(dependency).map_err(SitepackError::Validation)?);
            }
        }

        Ok(entries.into_iter().collect())
    }
}
