//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "sitepack.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Sitepack configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIGURATION);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your site name and source directories", self.output);
                println!("  2. Validate configuration: sitepack validate-config");
                println!("  3. Export the site: sitepack export");
                println!("     or one package: sitepack export --package <id>");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(exit_code::FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Sitepack Configuration File

[application]
log_level = "info"

[site]
name = "My Site"

[source]
config_dir = "./config/sync"
files_dir = "./files"

[export]
full_export_limit = 10
temp_dir = "/tmp/sitepack"
excluded_types = ["custom_style_type"]

[logging]
local_enabled = false
local_path = "/var/log/sitepack"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Sitepack Configuration File
#
# Every value can be overridden with SITEPACK_<SECTION>_<KEY>, for example
# SITEPACK_EXPORT_FULL_EXPORT_LIMIT=50. Values may reference environment
# variables with ${VAR_NAME}.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Site
# ============================================================================
[site]
# The archive is named after the site: lower-cased, every run of characters
# outside [a-z0-9] replaced by "-". "My Site" becomes my-site.tar.gz
name = "My Site"

# ============================================================================
# Source Stores
# ============================================================================
[source]
# One <name>.yml per configuration record
config_dir = "./config/sync"

# One <uuid>.yml descriptor per file asset, next to the asset's bytes
files_dir = "./files"

# ============================================================================
# Export Configuration
# ============================================================================
[export]
# Entries per batch (1-1000)
full_export_limit = 10

# Where the archive and the generation marker file are kept
temp_dir = "/tmp/sitepack"

# Default destination of `sitepack export --format directory`
# sync_directory = "/srv/site/config/export"

# Config types left out of full-site exports. A record is excluded when any
# segment of its name except the last is listed here.
excluded_types = ["custom_style_type"]

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON log files
local_enabled = false

# Local log directory
local_path = "/var/log/sitepack"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
