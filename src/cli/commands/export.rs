//! Export command implementation
//!
//! This module implements the `export` command: a package or the full site,
//! written either as a gzip tar artifact or as flat files in a directory.

use crate::adapters::filesystem::FileStorage;
use crate::adapters::storage::factory::create_source_stores;
use crate::cli::{confirm, exit_code};
use crate::config::schema::MAX_CHUNK_SIZE;
use crate::config::{load_config, SitepackConfig};
use crate::core::export::{
    DirectoryExporter, ExportCoordinator, ExportFormat, ExportSummary, TypePolicy,
};
use crate::domain::{ExportScope, SitepackError};
use clap::Args;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::watch;

/// Yes/no question asked before existing output is replaced
type Prompt = dyn Fn(&str) -> std::io::Result<bool> + Sync;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Package to export; the full site when omitted
    #[arg(long, value_name = "ID")]
    pub package: Option<String>,

    /// Destination directory [default: export.temp_dir for archives,
    /// export.sync_directory for directory exports]
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Output format (archive or directory)
    #[arg(long, default_value = "archive")]
    pub format: String,

    /// Entries per batch [default: export.full_export_limit]
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Start even if another generation is marked in progress
    #[arg(long)]
    pub force: bool,

    /// Keep the incomplete artifact of a failed or interrupted run
    #[arg(long)]
    pub keep_partial: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &Path,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        self.execute_with_prompt(config_path, shutdown_signal, &confirm)
            .await
    }

    async fn execute_with_prompt(
        &self,
        config_path: &Path,
        shutdown_signal: watch::Receiver<bool>,
        prompt: &Prompt,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration load failed");
                eprintln!("Failed to load configuration: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let format = match ExportFormat::from_str(&self.format) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let chunk_size = self.chunk_size.unwrap_or(config.export.full_export_limit);
        if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
            eprintln!("Invalid chunk size {chunk_size}: must be between 1 and {MAX_CHUNK_SIZE}");
            return Ok(exit_code::CONFIGURATION);
        }

        let scope = match ExportScope::from_option(self.package.as_deref()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Invalid package id: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        match format {
            ExportFormat::Archive => {
                self.export_archive(&config, &scope, chunk_size, shutdown_signal, prompt)
                    .await
            }
            ExportFormat::Directory => self.export_directory(&config, &scope, prompt).await,
        }
    }

    async fn export_archive(
        &self,
        config: &SitepackConfig,
        scope: &ExportScope,
        chunk_size: usize,
        shutdown_signal: watch::Receiver<bool>,
        prompt: &Prompt,
    ) -> anyhow::Result<i32> {
        let destination = match &self.path {
            Some(dir) => dir.join(config.site.artifact_filename()),
            None => config.artifact_path(),
        };

        if destination.exists() && !self.yes {
            println!(
                "The existing package at {} will be deleted and replaced.",
                destination.display()
            );
            if !prompt("Continue?")? {
                println!("Export cancelled.");
                return Ok(exit_code::USER_ABORT);
            }
        }

        let coordinator = ExportCoordinator::from_config(config)
            .with_force(self.force)
            .with_shutdown_signal(shutdown_signal);

        println!("🚀 Exporting {scope} to {}", destination.display());
        println!("  Batch size: {chunk_size}");
        println!();

        let summary = match coordinator.run(scope, &destination, chunk_size).await {
            Ok(s) => s,
            Err(e) if e.is_resolution_error() => {
                tracing::error!(error = %e, "Export could not start");
                eprintln!("❌ {e}");
                return Ok(exit_code::CONFIGURATION);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                self.discard_partial(&destination);
                return Ok(exit_code::EXPORT_FAILED);
            }
        };

        print_summary(&summary);

        if summary.interrupted {
            println!("⚠️  Export interrupted. The artifact was not finalized.");
            self.discard_partial(&destination);
            tracing::info!("Export interrupted by user signal");
            return Ok(exit_code::INTERRUPTED);
        }

        println!("✅ Export completed successfully!");
        Ok(exit_code::SUCCESS)
    }

    async fn export_directory(
        &self,
        config: &SitepackConfig,
        scope: &ExportScope,
        prompt: &Prompt,
    ) -> anyhow::Result<i32> {
        let destination = match resolve_sync_directory(self.path.as_deref(), config) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let target = FileStorage::new(&destination);
        if !target.is_empty().await? && !self.yes {
            println!(
                "The .yml files in your export directory ({}) will be deleted and replaced with the package config and files.",
                destination.display()
            );
            if !prompt("Continue?")? {
                println!("Export cancelled.");
                return Ok(exit_code::USER_ABORT);
            }
        }

        let exporter = DirectoryExporter::from_stores(
            create_source_stores(config),
            TypePolicy::new(config.export.excluded_types.iter().cloned()),
        );

        println!("🚀 Exporting {scope} to {}", destination.display());
        match exporter.export(scope, &target, true).await {
            Ok(summary) => {
                println!("✅ {}", summary.message());
                Ok(exit_code::SUCCESS)
            }
            Err(e) if e.is_resolution_error() => {
                eprintln!("❌ {e}");
                Ok(exit_code::CONFIGURATION)
            }
            Err(e) => {
                tracing::error!(error = %e, "Directory export failed");
                eprintln!("❌ Export failed: {e}");
                Ok(exit_code::EXPORT_FAILED)
            }
        }
    }

    fn discard_partial(&self, artifact: &Path) {
        if self.keep_partial {
            println!("   Partial artifact kept at {}", artifact.display());
            return;
        }
        match std::fs::remove_file(artifact) {
            Ok(()) => tracing::info!(path = %artifact.display(), "Removed partial artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %artifact.display(), error = %e, "Failed to remove partial artifact")
            }
        }
    }
}

/// Destination of a directory export: the explicit path, else the
/// configured sync directory
pub fn resolve_sync_directory(
    explicit: Option<&Path>,
    config: &SitepackConfig,
) -> Result<PathBuf, SitepackError> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.export.sync_directory.clone())
        .ok_or_else(|| SitepackError::DestinationUnresolved("export.sync_directory".to_string()))
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Scope: {}", summary.scope);
    println!("  Configs: {}", summary.config_count);
    println!("  Files: {}", summary.file_count);
    println!("  Batches: {}", summary.batch_count);
    if summary.skipped > 0 {
        println!("  Skipped (missing records): {}", summary.skipped);
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    for message in &summary.messages {
        println!("    {message}");
    }
    if let Some(artifact) = &summary.artifact {
        println!("  Artifact: {}", artifact.path.display());
        println!("  Size: {} bytes", artifact.size);
        println!("  SHA-256: {}", artifact.checksum);
    }
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    fn config(sync_directory: Option<&str>) -> SitepackConfig {
        let mut toml = String::from(
            "[site]\nname = \"Demo\"\n\n[source]\nconfig_dir = \"./config\"\nfiles_dir = \"./files\"\n",
        );
        if let Some(dir) = sync_directory {
            toml.push_str(&format!("\n[export]\nsync_directory = \"{dir}\"\n"));
        }
        parse_config(&toml).unwrap()
    }

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs {
            package: None,
            path: None,
            format: "archive".to_string(),
            chunk_size: None,
            yes: false,
            force: false,
            keep_partial: false,
        };

        assert!(args.package.is_none());
        assert_eq!(ExportFormat::from_str(&args.format).unwrap(), ExportFormat::Archive);
    }

    #[test]
    fn test_sync_directory_prefers_explicit_path() {
        let config = config(Some("/srv/configured"));
        let dir = resolve_sync_directory(Some(Path::new("/srv/explicit")), &config).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/explicit"));

        let dir = resolve_sync_directory(None, &config).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/configured"));
    }

    fn declined(_: &str) -> std::io::Result<bool> {
        Ok(false)
    }

    fn accepted(_: &str) -> std::io::Result<bool> {
        Ok(true)
    }

    fn never_asked(prompt: &str) -> std::io::Result<bool> {
        panic!("unexpected prompt: {prompt}")
    }

    /// A one-record site whose configuration file lives in `dir`
    fn site(dir: &tempfile::TempDir) -> PathBuf {
        let root = dir.path();
        std::fs::create_dir_all(root.join("config")).unwrap();
        std::fs::create_dir_all(root.join("files")).unwrap();
        std::fs::write(root.join("config/site.page.home.yml"), "label: Home\n").unwrap();

        let config_path = root.join("sitepack.toml");
        std::fs::write(
            &config_path,
            format!(
                "[site]\nname = \"Demo\"\n\n[source]\nconfig_dir = \"{}\"\nfiles_dir = \"{}\"\n\n[export]\ntemp_dir = \"{}\"\n",
                root.join("config").display(),
                root.join("files").display(),
                root.join("tmp").display(),
            ),
        )
        .unwrap();
        config_path
    }

    fn archive_args(out: &Path, yes: bool) -> ExportArgs {
        ExportArgs {
            package: None,
            path: Some(out.to_path_buf()),
            format: "archive".to_string(),
            chunk_size: None,
            yes,
            force: false,
            keep_partial: false,
        }
    }

    fn no_shutdown() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    #[tokio::test]
    async fn test_existing_artifact_kept_when_overwrite_declined() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = site(&dir);
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("demo.tar.gz"), "previous package").unwrap();

        let code = archive_args(&out, false)
            .execute_with_prompt(&config_path, no_shutdown(), &declined)
            .await
            .unwrap();

        assert_eq!(code, exit_code::USER_ABORT);
        assert_eq!(
            std::fs::read_to_string(out.join("demo.tar.gz")).unwrap(),
            "previous package"
        );
    }

    #[tokio::test]
    async fn test_existing_artifact_replaced_when_overwrite_accepted() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = site(&dir);
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("demo.tar.gz"), "previous package").unwrap();

        let code = archive_args(&out, false)
            .execute_with_prompt(&config_path, no_shutdown(), &accepted)
            .await
            .unwrap();

        assert_eq!(code, exit_code::SUCCESS);
        let members = crate::core::export::archive::list_members(&out.join("demo.tar.gz")).unwrap();
        assert_eq!(members, vec!["site.page.home.yml", crate::domain::INDEX_FILE_NAME]);
    }

    #[tokio::test]
    async fn test_no_prompt_for_new_artifact_or_with_yes() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = site(&dir);
        let out = dir.path().join("out");

        for yes in [false, true] {
            let code = archive_args(&out, yes)
                .execute_with_prompt(&config_path, no_shutdown(), &never_asked)
                .await
                .unwrap();
            assert_eq!(code, exit_code::SUCCESS);
            assert!(out.join("demo.tar.gz").is_file());
        }
    }

    #[test]
    fn test_sync_directory_unresolved() {
        let err = resolve_sync_directory(None, &config(None)).unwrap_err();
        assert!(matches!(err, SitepackError::DestinationUnresolved(_)));
        assert!(err.to_string().contains("export.sync_directory"));
    }
}
