//! Remove command implementation
//!
//! Deletes the site artifact and clears its generation marker.

use crate::adapters::storage::factory::create_state_storage;
use crate::cli::{confirm, exit_code};
use crate::config::load_config;
use crate::core::state::StateManager;
use clap::Args;
use std::io;
use std::path::Path;

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Remove even while a generation is marked in progress
    #[arg(long)]
    pub force: bool,
}

impl RemoveArgs {
    /// Execute the remove command
    pub async fn execute(&self, config_path: &Path) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let artifact = config.artifact_path();
        let state_manager = StateManager::new_with_storage(create_state_storage(&config));
        tracing::info!(artifact = %artifact.display(), "Removing artifact");

        if let Some(marker) = state_manager.load_marker(&artifact).await? {
            if marker.is_in_progress() && !self.force {
                println!("❌ A generation of {} is in progress", artifact.display());
                println!("   Use --force if no export is running");
                return Ok(exit_code::CONFIGURATION);
            }
        }

        if !self.yes && !confirm(&format!("Delete {}?", artifact.display()))? {
            println!("Removal cancelled.");
            return Ok(exit_code::USER_ABORT);
        }

        match std::fs::remove_file(&artifact) {
            Ok(()) => println!("🗑️  Deleted {}", artifact.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                println!("No artifact at {}", artifact.display())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to delete artifact");
                println!("❌ Failed to delete {}: {e}", artifact.display());
                return Ok(exit_code::FATAL);
            }
        }

        state_manager.clear_generation(&artifact).await?;
        println!("✅ Generation marker cleared");
        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_args_defaults() {
        let args = RemoveArgs {
            yes: false,
            force: false,
        };
        assert!(!args.yes);
        assert!(!args.force);
    }
}
