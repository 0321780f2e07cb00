//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Sitepack configuration file.

use crate::cli::exit_code;
use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &Path) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path.display(), "Validating configuration");

        println!("🔍 Validating configuration file: {}", config_path.display());
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Site: {}", config.site.name);
        println!("  Artifact: {}", config.artifact_path().display());
        println!("  Config Directory: {}", config.source.config_dir.display());
        println!("  Files Directory: {}", config.source.files_dir.display());
        println!("  Batch Size: {}", config.export.full_export_limit);
        match &config.export.sync_directory {
            Some(dir) => println!("  Sync Directory: {}", dir.display()),
            None => println!("  Sync Directory: (not set)"),
        }
        println!("  Excluded Types: {:?}", config.export.excluded_types);
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }

        for (label, dir) in [
            ("config_dir", &config.source.config_dir),
            ("files_dir", &config.source.files_dir),
        ] {
            if !dir.is_dir() {
                println!("  ⚠️  source.{label} does not exist yet: {}", dir.display());
            }
        }
        println!();

        Ok(exit_code::SUCCESS)
    }
}
