//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SitepackConfig;
use crate::domain::errors::SitepackError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "sitepack.toml";

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "SITEPACK_CONFIG";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SitepackConfig
/// 4. Applies environment variable overrides (SITEPACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use sitepack::config::loader::load_config;
///
/// let config = load_config("sitepack.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SitepackConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SitepackError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SitepackError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
pub fn parse_config(contents: &str) -> Result<SitepackConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SitepackConfig = toml::from_str(&contents)
        .map_err(|e| SitepackError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SitepackError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Resolves which configuration file to load
///
/// An explicit path wins, then `SITEPACK_CONFIG`, then `sitepack.toml` in the
/// working directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SitepackError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Comment lines are copied verbatim
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SitepackError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SITEPACK_* prefix
///
/// Environment variables follow the pattern: SITEPACK_<SECTION>_<KEY>
/// For example: SITEPACK_SITE_NAME, SITEPACK_EXPORT_FULL_EXPORT_LIMIT
fn apply_env_overrides(config: &mut SitepackConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SITEPACK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Site overrides
    if let Ok(val) = std::env::var("SITEPACK_SITE_NAME") {
        config.site.name = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("SITEPACK_SOURCE_CONFIG_DIR") {
        config.source.config_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("SITEPACK_SOURCE_FILES_DIR") {
        config.source.files_dir = PathBuf::from(val);
    }

    // Export overrides
    if let Ok(val) = std::env::var("SITEPACK_EXPORT_FULL_EXPORT_LIMIT") {
        config.export.full_export_limit = val.parse().map_err(|_| {
            SitepackError::Configuration(format!(
                "SITEPACK_EXPORT_FULL_EXPORT_LIMIT must be a positive integer, got '{val}'"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("SITEPACK_EXPORT_TEMP_DIR") {
        config.export.temp_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("SITEPACK_EXPORT_SYNC_DIRECTORY") {
        config.export.sync_directory = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("SITEPACK_EXPORT_EXCLUDED_TYPES") {
        config.export.excluded_types = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SITEPACK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SITEPACK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SITEPACK_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SITEPACK_TEST_VAR", "test_value");
        let input = "name = \"${SITEPACK_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "name = \"test_value\"\n");
        std::env::remove_var("SITEPACK_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SITEPACK_MISSING_VAR");
        let input = "name = \"${SITEPACK_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("SITEPACK_COMMENTED_VAR");
        let input = "# name = \"${SITEPACK_COMMENTED_VAR}\"\nname = \"x\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${SITEPACK_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = resolve_config_path(Some(Path::new("custom.toml")));
        assert_eq!(path, PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[site]
name = "Loader Site"

[source]
config_dir = "./config"
files_dir = "./files"

[export]
full_export_limit = 25
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.site.normalized_name(), "loader-site");
        assert_eq!(config.export.full_export_limit, 25);
        assert_eq!(config.export.excluded_types, vec!["custom_style_type"]);
    }

    #[test]
    fn test_load_config_rejects_invalid_limit() {
        let toml_content = r#"
[site]
name = "x"

[source]
config_dir = "./config"
files_dir = "./files"

[export]
full_export_limit = 0
"#;
        let err = parse_config(toml_content).unwrap_err();
        assert!(err.to_string().contains("full_export_limit"));
    }
}
