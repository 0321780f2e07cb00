//! Source resolution
//!
//! Turns an [`ExportScope`] into the ordered list of entries a run exports.
//! Resolution only reads from the source stores.

use crate::adapters::storage::traits::{ConfigSource, PackageRepository};
use crate::domain::{ConfigName, Entry, ExportScope, FileUuid, Result, SitepackError};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Type identifiers a full export leaves out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePolicy {
    excluded: BTreeSet<String>,
}

impl TypePolicy {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that keeps every record
    pub fn allow_all() -> Self {
        Self {
            excluded: BTreeSet::new(),
        }
    }

    /// Whether any type segment of `name` is excluded
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepack::core::export::TypePolicy;
    /// use sitepack::domain::ConfigName;
    ///
    /// let policy = TypePolicy::default();
    /// let style = ConfigName::new("cohesion.custom_style_type.brand").unwrap();
    /// assert!(policy.is_excluded(&style));
    ///
    /// // The last segment is the record's own id, never a type
    /// let named = ConfigName::new("system.custom_style_type").unwrap();
    /// assert!(!policy.is_excluded(&named));
    /// ```
    pub fn is_excluded(&self, name: &ConfigName) -> bool {
        name.type_segments().any(|segment| self.excluded.contains(segment))
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }
}

impl Default for TypePolicy {
    fn default() -> Self {
        Self::new(["custom_style_type"])
    }
}

/// Entries selected by a scope, split by kind
///
/// Both lists are sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedScope {
    configs: Vec<ConfigName>,
    files: Vec<FileUuid>,
}

impl ResolvedScope {
    fn from_sets(configs: BTreeSet<ConfigName>, files: BTreeSet<FileUuid>) -> Self {
        Self {
            configs: configs.into_iter().collect(),
            files: files.into_iter().collect(),
        }
    }

    /// Config names in scope
    pub fn list_all(&self) -> &[ConfigName] {
        &self.configs
    }

    /// File assets in scope
    pub fn storage_file_list(&self) -> &[FileUuid] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.configs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty() && self.files.is_empty()
    }

    /// Config entries first, then file entries
    pub fn into_entries(self) -> Vec<Entry> {
        self.configs
            .into_iter()
            .map(Entry::Config)
            .chain(self.files.into_iter().map(Entry::File))
            .collect()
    }
}

/// Resolves scopes against the source stores
#[derive(Clone)]
pub struct SourceResolver {
    source: Arc<dyn ConfigSource + Send + Sync>,
    packages: Arc<dyn PackageRepository + Send + Sync>,
    policy: TypePolicy,
}

impl SourceResolver {
    pub fn new(
        source: Arc<dyn ConfigSource + Send + Sync>,
        packages: Arc<dyn PackageRepository + Send + Sync>,
        policy: TypePolicy,
    ) -> Self {
        Self {
            source,
            packages,
            policy,
        }
    }

    pub fn policy(&self) -> &TypePolicy {
        &self.policy
    }

    /// Ordered entries of a scope
    ///
    /// # Errors
    ///
    /// Returns [`SitepackError::ScopeNotFound`] if a named package does not
    /// exist.
    pub async fn resolve(&self, scope: &ExportScope) -> Result<Vec<Entry>> {
        Ok(self.resolve_scope(scope).await?.into_entries())
    }

    /// Entries of a scope, split into config names and file assets
    pub async fn resolve_scope(&self, scope: &ExportScope) -> Result<ResolvedScope> {
        let resolved = match scope {
            ExportScope::Named(id) => {
                let package = self
                    .packages
                    .load(id)
                    .await?
                    .ok_or_else(|| SitepackError::ScopeNotFound(id.to_string()))?;

                let mut configs = BTreeSet::new();
                let mut files = BTreeSet::new();
                for entry in package.entries()? {
                    match entry {
                        Entry::Config(name) => {
                            configs.insert(name);
                        }
                        Entry::File(uuid) => {
                            files.insert(uuid);
                        }
                    }
                }
                ResolvedScope::from_sets(configs, files)
            }
            ExportScope::Full => self.resolve_full().await?,
        };

        tracing::info!(
            scope = %scope,
            configs = resolved.configs.len(),
            files = resolved.files.len(),
            "Resolved export scope"
        );

        Ok(resolved)
    }

    async fn resolve_full(&self) -> Result<ResolvedScope> {
        let mut configs = BTreeSet::new();
        let mut files = BTreeSet::new();
        let mut excluded = 0usize;

        for name in self.source.list_all().await? {
            if self.policy.is_excluded(&name) {
                excluded += 1;
                continue;
            }

            // Records that vanish between listing and reading are still
            // listed; the archive writer skips them.
            if let Some(record) = self.source.read(&name).await? {
                files.extend(record.file_references());
            }
            configs.insert(name);
        }

        if excluded > 0 {
            tracing::debug!(excluded, "Skipped records of excluded types");
        }

        Ok(ResolvedScope::from_sets(configs, files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigRecord, PackageDefinition, PackageId};
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    const LOGO: &str = "4b8f3a29-5d9c-4f87-aa95-84d7c3f51f6a";
    const HERO: &str = "0f2b7a8c-3c3e-4e2b-9a64-7f4dbe0c6a11";

    struct MapSource(BTreeMap<ConfigName, ConfigRecord>);

    impl MapSource {
        fn new(records: &[(&str, &str)]) -> Self {
            let map = records
                .iter()
                .map(|(name, yaml)| {
                    let name = ConfigName::new(*name).unwrap();
                    let record = ConfigRecord::from_yaml(name.clone(), yaml).unwrap();
                    (name, record)
                })
                .collect();
            Self(map)
        }
    }

    #[async_trait]
    impl ConfigSource for MapSource {
        async fn list_all(&self) -> Result<Vec<ConfigName>> {
            Ok(self.0.keys().cloned().collect())
        }

        async fn read(&self, name: &ConfigName) -> Result<Option<ConfigRecord>> {
            Ok(self.0.get(name).cloned())
        }
    }

    struct RecordPackages(Arc<MapSource>);

    #[async_trait]
    impl PackageRepository for RecordPackages {
        async fn load(&self, id: &PackageId) -> Result<Option<PackageDefinition>> {
            let name = ConfigName::new(id.config_name()).unwrap();
            match self.0.read(&name).await? {
                Some(record) => Ok(Some(PackageDefinition::from_record(id.clone(), &record)?)),
                None => Ok(None),
            }
        }
    }

    fn resolver(policy: TypePolicy) -> SourceResolver {
        let package_settings = format!(
            r#"{{"cohesion_elements.component.hero":{{"kind":"config","dependencies":["system.site","{HERO}"]}}}}"#
        );
        let package_yaml = format!(
            "type: site_package\nlabel: Landing\nsettings: '{}'\n",
            package_settings
        );
        let logo_yaml = format!("dependencies:\n  content:\n    - file:file:{LOGO}\n");
        let style_yaml = format!("dependencies:\n  content:\n    - file:file:{HERO}\n");

        let source = Arc::new(MapSource::new(&[
            ("system.site", "name: Demo\n"),
            ("cohesion_elements.component.hero", &logo_yaml),
            ("cohesion.custom_style_type.brand", &style_yaml),
            ("sitepack.package.landing", &package_yaml),
        ]));
        let packages = Arc::new(RecordPackages(Arc::clone(&source)));
        SourceResolver::new(source, packages, policy)
    }

    #[tokio::test]
    async fn test_full_scope_applies_policy() {
        let entries = resolver(TypePolicy::default())
            .resolve(&ExportScope::Full)
            .await
            .unwrap();

        let ids: Vec<String> = entries.iter().map(Entry::to_string).collect();
        assert_eq!(
            ids,
            vec![
                "config:cohesion_elements.component.hero".to_string(),
                "config:sitepack.package.landing".to_string(),
                "config:system.site".to_string(),
                format!("file:{LOGO}"),
            ]
        );
    }

    #[tokio::test]
    async fn test_full_scope_without_exclusions() {
        let scope = resolver(TypePolicy::allow_all())
            .resolve_scope(&ExportScope::Full)
            .await
            .unwrap();

        assert_eq!(scope.list_all().len(), 4);
        assert_eq!(scope.storage_file_list().len(), 2);
        assert_eq!(scope.len(), 6);
    }

    #[tokio::test]
    async fn test_named_scope_restricts_to_members() {
        let scope = ExportScope::Named(PackageId::new("landing").unwrap());
        let entries = resolver(TypePolicy::default()).resolve(&scope).await.unwrap();

        let ids: Vec<String> = entries.iter().map(Entry::identifier).collect();
        assert_eq!(
            ids,
            vec![
                "cohesion_elements.component.hero".to_string(),
                "sitepack.package.landing".to_string(),
                "system.site".to_string(),
                HERO.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_named_scope_missing_package() {
        let scope = ExportScope::Named(PackageId::new("missing-id").unwrap());
        let err = resolver(TypePolicy::default())
            .resolve(&scope)
            .await
            .unwrap_err();
        assert!(matches!(err, SitepackError::ScopeNotFound(id) if id == "missing-id"));
    }

    #[test]
    fn test_policy_checks_type_segments_only() {
        let policy = TypePolicy::new(["views"]);
        assert!(policy.is_excluded(&ConfigName::new("views.view.frontpage").unwrap()));
        assert!(!policy.is_excluded(&ConfigName::new("system.views").unwrap()));
        assert!(!policy.is_excluded(&ConfigName::new("views").unwrap()));
    }
}
