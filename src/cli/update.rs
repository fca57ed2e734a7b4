//! Update every configured product to its newest build.
//!
//! This module provides the `update` command, the core of toolup and the
//! default action of a bare invocation. It loads the product list, asks the
//! release catalogs for the newest build of each product, and replaces any
//! installation whose recorded build is older.
//!
//! # Failure Policy
//!
//! A product that fails mid-update aborts the whole run by default, leaving
//! later products untouched. With `--keep-going` the failure is recorded and
//! the remaining products are still processed; the command then exits
//! non-zero if anything failed. Errors that would affect every product the
//! same way (an unreadable config, an unreachable catalog) abort regardless.
//!
//! # Examples
//!
//! ```bash
//! toolup update
//! toolup update --keep-going
//! toolup --config ~/jetbrains/toolup.json update
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::catalog::ProductCatalog;
use crate::config::Config;
use crate::download::HttpDownloader;
use crate::updater::{ProductOutcome, UpdateOrchestrator};

/// Command to update all configured products.
#[derive(Args, Default)]
pub struct UpdateCommand {
    /// Continue with the remaining products when one fails
    ///
    /// Per-product failures are recorded and reported in the summary instead
    /// of aborting the run. The exit code is still non-zero if anything
    /// failed.
    #[arg(long)]
    keep_going: bool,
}

impl UpdateCommand {
    /// Execute the update command against the configured product list.
    ///
    /// # Returns
    ///
    /// - `Ok(())` when every product was updated, already current, or skipped
    /// - `Err(anyhow::Error)` when the config cannot be loaded, a product
    ///   fails without `--keep-going`, or any product failed with it
    pub async fn execute(self) -> Result<()> {
        let config = Config::load().await?;
        self.run(config).await
    }

    async fn run(self, config: Config) -> Result<()> {
        let orchestrator = UpdateOrchestrator::new(ProductCatalog::new(), HttpDownloader::new())
            .keep_going(self.keep_going);

        let outcomes = orchestrator.run(&config.products).await?;
        print_summary(&outcomes);

        let failures = outcomes.iter().filter(|o| o.is_failure()).count();
        if failures > 0 {
            anyhow::bail!("{} of {} products failed to update", failures, outcomes.len());
        }
        Ok(())
    }
}

/// Prints the per-product outcome list and a closing count line.
fn print_summary(outcomes: &[ProductOutcome]) {
    if outcomes.is_empty() {
        println!("{}", "No products configured.".yellow());
        return;
    }

    println!("\n{}", "Summary:".bold());
    for outcome in outcomes {
        match outcome {
            ProductOutcome::Updated {
                name,
                build,
            } => {
                println!("  {} {} updated to {}", "✓".green(), name.bold(), build.green());
            }
            ProductOutcome::UpToDate {
                name,
                build,
            } => {
                println!("  {} {} already at {}", "✓".green(), name, build);
            }
            ProductOutcome::Skipped {
                name,
                reason,
            } => {
                println!("  {} {} skipped: {}", "-".bright_black(), name, reason.bright_black());
            }
            ProductOutcome::Failed {
                name,
                reason,
            } => {
                println!("  {} {} failed: {}", "✗".red(), name.bold(), reason.red());
            }
        }
    }

    let updated =
        outcomes.iter().filter(|o| matches!(o, ProductOutcome::Updated { .. })).count();
    let failed = outcomes.iter().filter(|o| o.is_failure()).count();

    if updated > 0 {
        println!("\n{} Updated {} product(s)", "✓".green(), updated);
    } else if failed == 0 {
        println!("\n{}", "Everything is up to date!".green());
    }
}
