//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers an export deals with. Each type
//! ensures type safety and validates its format on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Package identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use sitepack::domain::ids::PackageId;
/// use std::str::FromStr;
///
/// let id = PackageId::from_str("landing_pages").unwrap();
/// assert_eq!(id.config_name(), "sitepack.package.landing_pages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(String);

impl PackageId {
    /// Prefix of the configuration records holding package definitions
    pub const CONFIG_PREFIX: &'static str = "sitepack.package.";

    /// Creates a new PackageId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Package ID cannot be empty".to_string());
        }
        if id.contains('/') {
            return Err(format!("Package ID cannot contain '/': {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the package ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the configuration record that defines this package
    pub fn config_name(&self) -> String {
        format!("{}{}", Self::CONFIG_PREFIX, self.0)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Configuration record name, e.g. `cohesion_elements.component.hero`
///
/// Names are dot separated. Every segment but the last names the type the
/// record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigName(String);

impl ConfigName {
    /// Creates a new ConfigName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Config name cannot be empty".to_string());
        }
        if name.contains('/') || name.contains('\\') {
            return Err(format!("Config name cannot contain path separators: {name}"));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type segments of the name (all dot segments except the last)
    pub fn type_segments(&self) -> impl Iterator<Item = &str> {
        let mut parts: Vec<&str> = self.0.split('.').collect();
        parts.pop();
        parts.into_iter()
    }

    /// Archive member name for this record
    pub fn member_name(&self) -> String {
        format!("{}.yml", self.0)
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConfigName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ConfigName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Content-unique file asset identifier
///
/// Always a valid UUID, stored in its canonical hyphenated lower-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileUuid(Uuid);

impl FileUuid {
    /// Prefix used by content dependencies that point at a file entity
    pub const DEPENDENCY_PREFIX: &'static str = "file:file:";

    /// Parses a file identifier
    pub fn new(id: &str) -> Result<Self, String> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|e| format!("Invalid file UUID '{id}': {e}"))
    }

    /// Whether the string is a syntactically valid UUID
    pub fn is_valid(id: &str) -> bool {
        Uuid::parse_str(id).is_ok()
    }

    /// Parses a `file:file:<uuid>` content dependency
    pub fn from_dependency(dependency: &str) -> Option<Self> {
        dependency
            .strip_prefix(Self::DEPENDENCY_PREFIX)
            .and_then(|id| Self::new(id).ok())
    }

    /// Content dependency name of the file, `file:file:<uuid>`
    pub fn dependency_name(&self) -> String {
        format!("{}{}", Self::DEPENDENCY_PREFIX, self.0.hyphenated())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FileUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for FileUuid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_id_valid() {
        let id = PackageId::new("landing_pages").unwrap();
        assert_eq!(id.as_str(), "landing_pages");
        assert_eq!(id.to_string(), "landing_pages");
    }

    #[test]
    fn test_package_id_empty() {
        assert!(PackageId::new("").is_err());
        assert!(PackageId::new("   ").is_err());
        assert!(PackageId::new("a/b").is_err());
    }

    #[test]
    fn test_config_name_type_segments() {
        let name = ConfigName::new("cohesion_elements.cohesion_component.hero").unwrap();
        let segments: Vec<&str> = name.type_segments().collect();
        assert_eq!(segments, vec!["cohesion_elements", "cohesion_component"]);
        assert_eq!(name.member_name(), "cohesion_elements.cohesion_component.hero.yml");
    }

    #[test]
    fn test_config_name_single_segment_has_no_type() {
        let name = ConfigName::new("standalone").unwrap();
        assert_eq!(name.type_segments().count(), 0);
    }

    #[test]
    fn test_config_name_rejects_paths() {
        assert!(ConfigName::new("../etc/passwd").is_err());
        assert!(ConfigName::new("").is_err());
    }

    #[test]
    fn test_file_uuid_roundtrip_dependency() {
        let id = FileUuid::new("4B8F3A29-5D9C-4F87-AA95-84D7C3F51F6A").unwrap();
        assert_eq!(id.to_string(), "4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a");
        assert_eq!(
            id.dependency_name(),
            "file:file:4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a"
        );
        assert_eq!(FileUuid::from_dependency(&id.dependency_name()), Some(id));
    }

    #[test]
    fn test_file_uuid_invalid() {
        assert!(FileUuid::new("not-a-uuid").is_err());
        assert!(!FileUuid::is_valid("system.site"));
        assert_eq!(FileUuid::from_dependency("config:system.site"), None);
    }
}
