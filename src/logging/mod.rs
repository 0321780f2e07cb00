//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output for interactive runs
//! - JSON-formatted local log files with daily or hourly rotation
//! - Helper macros for the events every export emits
//!
//! # Example
//!
//! ```no_run
//! use sitepack::logging::init_logging;
//! use sitepack::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use sitepack::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(12, 3, Duration::from_secs(2));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($configs:expr, $files:expr, $duration:expr) => {
        tracing::info!(
            config_count = $configs,
            file_count = $files,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use sitepack::log_error_with_context;
/// use sitepack::domain::SitepackError;
///
/// let error = SitepackError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a batch being processed (one-based batch number)
///
/// # Example
///
/// ```no_run
/// use sitepack::log_batch_processing;
///
/// log_batch_processing!(2, 3);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            batch = $current,
            total_batches = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}
