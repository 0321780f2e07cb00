//! Configuration schema types
//!
//! This module defines the configuration structure for Sitepack.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Smallest accepted batch size
pub const MIN_CHUNK_SIZE: usize = 1;

/// Largest accepted batch size
pub const MAX_CHUNK_SIZE: usize = 1000;

/// Name of the generation marker file kept next to the artifacts
pub const STATE_FILE_NAME: &str = ".sitepack-state.json";

/// Main Sitepack configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitepackConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Site identity
    pub site: SiteConfig,

    /// Where records and file assets are read from
    pub source: SourceConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SitepackConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.site.validate()?;
        self.source.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Full path of the archive artifact, `<temp_dir>/<site-name>.tar.gz`
    pub fn artifact_path(&self) -> PathBuf {
        self.export.temp_dir.join(self.site.artifact_filename())
    }

    /// Path of the generation marker store
    pub fn state_path(&self) -> PathBuf {
        self.export.temp_dir.join(STATE_FILE_NAME)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Site identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Human-readable site name
    pub name: String,
}

impl SiteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("site.name cannot be empty".to_string());
        }
        Ok(())
    }

    /// Site name lower-cased, with every run of characters outside
    /// `[a-z0-9]` replaced by a single `-`
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepack::config::SiteConfig;
    ///
    /// let site = SiteConfig { name: "Acme Corp: Main Site".to_string() };
    /// assert_eq!(site.normalized_name(), "acme-corp-main-site");
    /// ```
    pub fn normalized_name(&self) -> String {
        static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
        let re = NON_ALNUM.get_or_init(|| {
            Regex::new(r"[^a-z0-9]+").expect("static pattern is valid")
        });
        re.replace_all(&self.name.to_lowercase(), "-").into_owned()
    }

    /// File name of the archive artifact
    pub fn artifact_filename(&self) -> String {
        format!("{}.tar.gz", self.normalized_name())
    }
}

/// Source store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding one `<name>.yml` per configuration record
    pub config_dir: PathBuf,

    /// Directory holding `<uuid>.yml` file descriptors and their blobs
    pub files_dir: PathBuf,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.config_dir.as_os_str().is_empty() {
            return Err("source.config_dir cannot be empty".to_string());
        }
        if self.files_dir.as_os_str().is_empty() {
            return Err("source.files_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Entries per batch
    #[serde(default = "default_full_export_limit")]
    pub full_export_limit: usize,

    /// Location of the archive artifact and the marker store
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Default destination of directory exports
    #[serde(default)]
    pub sync_directory: Option<PathBuf>,

    /// Type identifiers excluded from full exports
    #[serde(default = "default_excluded_types")]
    pub excluded_types: Vec<String>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.full_export_limit) {
            return Err(format!(
                "export.full_export_limit must be between {} and {}, got {}",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, self.full_export_limit
            ));
        }

        if self.temp_dir.as_os_str().is_empty() {
            return Err("export.temp_dir cannot be empty".to_string());
        }

        if self.excluded_types.iter().any(|t| t.trim().is_empty()) {
            return Err("export.excluded_types cannot contain empty entries".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            full_export_limit: default_full_export_limit(),
            temp_dir: default_temp_dir(),
            sync_directory: None,
            excluded_types: default_excluded_types(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_full_export_limit() -> usize {
    10
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("/tmp/sitepack")
}

fn default_excluded_types() -> Vec<String> {
    vec!["custom_style_type".to_string()]
}

fn default_local_path() -> String {
    "/var/log/sitepack".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
