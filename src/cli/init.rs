//! Write a starter toolup config file.
//!
//! This module provides the `init` command which creates a `toolup.json`
//! config file with a single example product. The generated entry carries
//! placeholder install paths and must be edited before the first update run.
//!
//! # Examples
//!
//! Create a config in the current directory:
//! ```bash
//! toolup init
//! ```
//!
//! Create it somewhere else, or overwrite an existing one:
//! ```bash
//! toolup --config ~/jetbrains/toolup.json init
//! toolup init --force
//! ```
//!
//! # Error Conditions
//!
//! - Returns an error if the config already exists and `--force` is not used
//! - Returns an error if the file cannot be written (permissions, disk space)

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_ENV, CONFIG_FILE, Config};

/// Command to write a starter `toolup.json`.
#[derive(Args, Default)]
pub struct InitCommand {
    /// Force overwrite if the config file already exists
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// The destination honors the `--config` flag (via `TOOLUP_CONFIG`) and
    /// falls back to `toolup.json` in the current directory.
    pub async fn execute(self) -> Result<()> {
        let destination = config_destination();
        self.execute_at(&destination).await
    }

    async fn execute_at(self, path: &Path) -> Result<()> {
        if path.exists() && !self.force {
            return Err(anyhow!(
                "Config already exists at {}. Use --force to overwrite",
                path.display()
            ));
        }

        Config::example().save_to(path).await?;

        println!("{} Wrote starter config to {}", "✓".green(), path.display());
        println!("\n{}", "Next steps:".cyan());
        println!("  Edit {} with your products and install paths", path.display());
        println!("  Then run {} to install the newest builds", "toolup".bright_white());

        Ok(())
    }
}

/// Resolves where the config should be written.
fn config_destination() -> PathBuf {
    std::env::var(CONFIG_ENV).map_or_else(|_| PathBuf::from(CONFIG_FILE), PathBuf::from)
}
