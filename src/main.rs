//! toolup CLI entry point
//!
//! This is the main executable for toolup, a batch updater for locally
//! installed JetBrains-style tools. It handles command-line argument parsing,
//! error display, and command execution.
//!
//! Supported commands:
//! - `update` - Update every configured product to its newest build (default)
//! - `outdated` - Report which products have newer builds available
//! - `init` - Write a starter toolup.json config

use anyhow::Result;
use clap::Parser;
use toolup::cli;
use toolup::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
