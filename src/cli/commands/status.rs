//! Status command implementation
//!
//! This module implements the `status` command for displaying the generation
//! marker and the artifact on disk.

use crate::adapters::storage::factory::create_state_storage;
use crate::cli::exit_code;
use crate::config::load_config;
use crate::core::state::{GenerationMarker, StateManager};
use crate::core::verification::verify_artifact;
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::Path;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Re-read the artifact and check that it is a complete package
    #[arg(long)]
    pub verify: bool,

    /// List the markers of every artifact in the state store
    #[arg(long)]
    pub all: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &Path) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let state_manager = StateManager::new_with_storage(create_state_storage(&config));

        if self.all {
            return self.list_markers(&state_manager).await;
        }

        let artifact = config.artifact_path();
        let marker = match state_manager.load_marker(&artifact).await {
            Ok(m) => m,
            Err(e) => {
                println!("❌ Failed to load generation marker");
                println!("   Error: {e}");
                return Ok(exit_code::FATAL);
            }
        };

        println!("  Site: {}", config.site.name);
        println!("  Artifact: {}", artifact.display());

        match std::fs::metadata(&artifact) {
            Ok(meta) => {
                println!("  Size: {} bytes", meta.len());
                if let Ok(modified) = meta.modified() {
                    let modified: DateTime<Utc> = modified.into();
                    println!("  Modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
                }
            }
            Err(_) => println!("  File: not present"),
        }

        let Some(marker) = marker else {
            println!();
            println!("No export history found.");
            println!("Run 'sitepack export' to generate the artifact.");
            return Ok(exit_code::SUCCESS);
        };

        print_marker(&marker);

        if self.verify {
            if !artifact.exists() {
                println!("❌ Nothing to verify: the artifact does not exist");
                return Ok(exit_code::EXPORT_FAILED);
            }
            let report = verify_artifact(&artifact, marker.checksum.as_deref())?;
            println!();
            print!("{}", report.format_summary());
            if !report.is_success() {
                return Ok(exit_code::EXPORT_FAILED);
            }
        }

        println!();
        Ok(exit_code::SUCCESS)
    }

    async fn list_markers(&self, state_manager: &StateManager) -> anyhow::Result<i32> {
        let markers = match state_manager.get_all_markers().await {
            Ok(m) => m,
            Err(e) => {
                println!("❌ Failed to load generation markers");
                println!("   Error: {e}");
                return Ok(exit_code::FATAL);
            }
        };

        if markers.is_empty() {
            println!("No export history found.");
            return Ok(exit_code::SUCCESS);
        }

        println!("Found {} marker(s):", markers.len());
        println!();
        println!(
            "{:<50} {:<16} {:<8} {:<8} {:<20}",
            "Artifact", "Status", "Configs", "Files", "Completed"
        );
        println!("{}", "-".repeat(104));

        for marker in &markers {
            let completed = marker
                .completed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "Never".to_string());
            println!(
                "{:<50} {:<16} {:<8} {:<8} {:<20}",
                marker.artifact_path.display(),
                status_label(marker),
                marker.config_count,
                marker.file_count,
                completed
            );
        }

        println!();
        Ok(exit_code::SUCCESS)
    }
}

fn status_label(marker: &GenerationMarker) -> &'static str {
    if marker.is_completed() {
        "✅ Completed"
    } else if marker.is_in_progress() {
        "🔄 In Progress"
    } else if marker.is_failed() {
        "❌ Failed"
    } else {
        "⏸️  Not Started"
    }
}

fn print_marker(marker: &GenerationMarker) {
    println!("  Status: {}", status_label(marker));
    if let Some(started) = marker.started_at {
        println!("  Started: {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(completed) = marker.completed_at {
        println!("  Completed: {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(duration) = marker.last_run_duration() {
        println!("  Duration: {}s", duration.num_seconds());
    }
    println!(
        "  Counts: {} configs, {} files, {} batches",
        marker.config_count, marker.file_count, marker.batch_count
    );
    if let Some(checksum) = &marker.checksum {
        println!("  SHA-256: {checksum}");
    }
    if let Some(error) = &marker.last_error {
        println!("  Last error: {error}");
    }
    if marker.is_in_progress() {
        println!();
        println!("⚠️  A generation is marked in progress. If no export is running,");
        println!("   the previous run crashed; use 'sitepack export --force' to restart.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{GenerationMarkerBuilder, GenerationStatus};

    #[test]
    fn test_status_args_defaults() {
        let args = StatusArgs {
            verify: false,
            all: false,
        };

        assert!(!args.verify);
        assert!(!args.all);
    }

    #[test]
    fn test_status_labels() {
        let completed = GenerationMarkerBuilder::new("site.tar.gz")
            .status(GenerationStatus::Completed)
            .build();
        let failed = GenerationMarkerBuilder::new("site.tar.gz")
            .status(GenerationStatus::Failed)
            .build();
        let fresh = GenerationMarkerBuilder::new("site.tar.gz").build();

        assert_eq!(status_label(&completed), "✅ Completed");
        assert_eq!(status_label(&failed), "❌ Failed");
        assert_eq!(status_label(&fresh), "⏸️  Not Started");
    }
}
