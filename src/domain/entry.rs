//! Export entries and scopes
//!
//! An [`Entry`] is one exportable unit. Its variant is the discriminator the
//! archive writer dispatches on, so classification never requires loading the
//! payload.

use super::ids::{ConfigName, FileUuid, PackageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an export entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A configuration record
    Config,
    /// A binary file asset
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::File => write!(f, "file"),
        }
    }
}

/// One exportable unit: a configuration record or a file asset
///
/// Ordering sorts every config entry before every file entry, then by
/// identifier, which is the order a resolved entry list is emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entry {
    /// Configuration record, identified by its name
    Config(ConfigName),
    /// File asset, identified by its UUID
    File(FileUuid),
}

impl Entry {
    /// Classifies an identifier: valid UUIDs are files, anything else is config
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepack::domain::{Entry, EntryKind};
    ///
    /// let entry = Entry::classify("system.site").unwrap();
    /// assert_eq!(entry.kind(), EntryKind::Config);
    ///
    /// let entry = Entry::classify("4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a").unwrap();
    /// assert_eq!(entry.kind(), EntryKind::File);
    /// ```
    pub fn classify(identifier: &str) -> Result<Self, String> {
        if FileUuid::is_valid(identifier) {
            Ok(Self::File(FileUuid::new(identifier)?))
        } else {
            Ok(Self::Config(ConfigName::new(identifier)?))
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Config(_) => EntryKind::Config,
            Self::File(_) => EntryKind::File,
        }
    }

    /// Identifier of the entry, unique within a run
    pub fn identifier(&self) -> String {
        match self {
            Self::Config(name) => name.to_string(),
            Self::File(uuid) => uuid.to_string(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.identifier())
    }
}

/// What an export run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// A single package and its dependencies
    Named(PackageId),
    /// Every exportable record and file on the site
    Full,
}

impl ExportScope {
    /// Builds a scope from an optional package id; `None` means a full export
    pub fn from_option(package: Option<&str>) -> Result<Self, String> {
        match package {
            Some(id) => Ok(Self::Named(PackageId::new(id)?)),
            None => Ok(Self::Full),
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(id) => write!(f, "package '{id}'"),
            Self::Full => write!(f, "full site"),
        }
    }
}
