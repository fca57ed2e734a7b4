//! Check for available updates without installing anything.
//!
//! The `outdated` command compares the build recorded in each product's
//! install marker against the newest build the release catalogs offer, and
//! reports the result. Nothing on disk is modified.
//!
//! # Output Formats
//!
//! - `table` (default): human-readable table with colored statuses
//! - `json`: machine-readable report for scripts and CI
//!
//! # Exit Codes
//!
//! With `--check` the process exits with code 1 when any product is out of
//! date, which makes the command usable as a CI gate:
//!
//! ```bash
//! toolup outdated --check && echo "everything current"
//! ```
//!
//! Products that the updater would skip (disabled, or missing install
//! directory configuration) are left out of the report.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::catalog::{ProductCatalog, ReleaseCatalog};
use crate::config::{Config, ProductConfig};
use crate::updater::{InstalledMarker, needs_update};
use crate::utils::progress::spinner_with_message;

/// Command to report which products have newer builds available.
#[derive(Args)]
#[command(about = "Check for available updates to configured products")]
pub struct OutdatedCommand {
    /// Exit with a non-zero code when any product is out of date
    #[arg(long)]
    check: bool,

    /// Output format (table or json)
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    format: String,
}

/// Update status of a single product.
#[derive(Debug, Clone, Serialize)]
struct ProductStatus {
    /// Product name from the config.
    name: String,
    /// Build recorded in the install marker, absent for fresh installs.
    installed: Option<String>,
    /// Newest build the catalog offers on the configured channel.
    latest: String,
    /// Whether an update pass would install something.
    outdated: bool,
}

/// Full report, the shape serialized for `--format json`.
#[derive(Debug, Serialize)]
struct OutdatedReport {
    products: Vec<ProductStatus>,
    summary: ReportSummary,
}

#[derive(Debug, Serialize)]
struct ReportSummary {
    total: usize,
    outdated: usize,
}

impl OutdatedCommand {
    /// Execute the outdated command against the configured product list.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on successful completion. With `--check`, the process
    /// exits with code 1 instead of returning when updates are available.
    ///
    /// # Errors
    ///
    /// Returns errors when the config cannot be loaded or a catalog query
    /// fails. Unreadable install markers are treated as "not installed"
    /// rather than failing the report, mirroring the updater.
    pub async fn execute(self) -> Result<()> {
        let config = Config::load().await?;
        let catalog = ProductCatalog::new();

        let spinner = spinner_with_message("Checking for updates");
        let statuses = collect_statuses(&catalog, &config.products).await;
        spinner.finish_and_clear();
        let statuses = statuses?;
        let report = OutdatedReport {
            summary: ReportSummary {
                total: statuses.len(),
                outdated: statuses.iter().filter(|s| s.outdated).count(),
            },
            products: statuses,
        };

        match self.format.as_str() {
            "json" => display_json(&report)?,
            _ => display_table(&report),
        }

        if self.check && report.summary.outdated > 0 {
            std::process::exit(1);
        }

        Ok(())
    }
}

/// Queries the catalog for every eligible product and pairs the answer with
/// the locally recorded build.
async fn collect_statuses<C: ReleaseCatalog>(
    catalog: &C,
    products: &[ProductConfig],
) -> Result<Vec<ProductStatus>> {
    let mut statuses = Vec::new();

    for product in products {
        if let Some(reason) = product.skip_reason() {
            tracing::debug!("Skipping {}: {}", product.name, reason);
            continue;
        }

        let release = catalog.latest_release(product).await?;

        let marker = match InstalledMarker::read_from(&product.install_dir()) {
            Ok(marker) => marker,
            Err(e) => {
                tracing::debug!("Treating {} as not installed: {}", product.name, e);
                None
            }
        };

        let outdated = needs_update(marker.as_ref(), &release.build);
        statuses.push(ProductStatus {
            name: product.name.clone(),
            installed: marker.map(|m| m.build),
            latest: release.build,
            outdated,
        });
    }

    Ok(statuses)
}

/// Pretty-prints the report as JSON to stdout.
fn display_json(report: &OutdatedReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Renders the report as a colored table with a summary block.
fn display_table(report: &OutdatedReport) {
    if report.products.is_empty() {
        println!("{}", "No products to check.".yellow());
        return;
    }

    println!(
        "\n{:<30} {:<18} {:<18} {:<10}",
        "Product".bold(),
        "Installed".bold(),
        "Latest".bold(),
        "Status".bold()
    );
    println!("{}", "─".repeat(79));

    for status in &report.products {
        let installed = status.installed.as_deref().unwrap_or("-");
        let (name, state) = if status.outdated {
            (status.name.yellow(), "outdated".yellow())
        } else {
            (status.name.normal(), "up-to-date".green())
        };

        println!("{:<30} {:<18} {:<18} {:<10}", name, installed, status.latest, state);
    }

    println!("\n{}", "Summary:".bold());
    println!("  Total products: {}", report.summary.total);
    if report.summary.outdated > 0 {
        println!(
            "  {} products have updates available",
            report.summary.outdated.to_string().yellow()
        );
    } else {
        println!("  {}", "All products are up to date!".green());
    }
}
