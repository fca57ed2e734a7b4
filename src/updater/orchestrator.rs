//! The per-product update workflow
//!
//! [`UpdateOrchestrator`] drives the whole run: for each configured
//! product it asks the catalog for the newest build, decides against the
//! install marker whether anything needs doing, and if so downloads the
//! archive to a scratch directory, replaces the old installation, and
//! records the new marker.
//!
//! Products are processed strictly in configuration order, one at a time.
//! The first error ends the run unless `--keep-going` was requested, in
//! which case per-product failures are recorded and the batch moves on;
//! catalog and configuration problems stay fatal either way, since every
//! remaining product would trip over them too.
//!
//! Failure handling is deliberately blunt: a fatal abort leaves the
//! scratch directory and possibly a half-written installation on disk.
//! There is no rollback, and nothing here verifies archive contents
//! beyond the extractor's own checks.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::decision::needs_update;
use super::marker::InstalledMarker;
use crate::archive::extract_tar_gz;
use crate::catalog::ReleaseCatalog;
use crate::config::ProductConfig;
use crate::core::ToolupError;
use crate::download::Downloader;
use crate::utils::fs::{create_dir_with_mode, remove_dir_all_quiet};
use crate::utils::permissions::parse_mode;

/// Archive file name inside the scratch directory.
const ARCHIVE_FILE: &str = "installation.tar.gz";

/// Per-product result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductOutcome {
    /// Product was not eligible for updating.
    Skipped { name: String, reason: String },
    /// Installed build is current, nothing touched.
    UpToDate { name: String, build: String },
    /// A new build was installed.
    Updated { name: String, build: String },
    /// The update failed and the batch kept going.
    Failed { name: String, reason: String },
}

impl ProductOutcome {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Skipped {
                name, ..
            }
            | Self::UpToDate {
                name, ..
            }
            | Self::Updated {
                name, ..
            }
            | Self::Failed {
                name, ..
            } => name,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Drives the update workflow over a product list.
pub struct UpdateOrchestrator<C: ReleaseCatalog, D: Downloader> {
    catalog: C,
    downloader: D,
    keep_going: bool,
}

impl<C: ReleaseCatalog, D: Downloader> UpdateOrchestrator<C, D> {
    pub fn new(catalog: C, downloader: D) -> Self {
        Self {
            catalog,
            downloader,
            keep_going: false,
        }
    }

    /// Continue the batch after per-product failures instead of aborting.
    #[must_use]
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Runs the batch over `products` in order.
    ///
    /// # Errors
    ///
    /// The first product failure by default; with `keep_going`, only
    /// batch-fatal problems (catalog and configuration errors).
    pub async fn run(&self, products: &[ProductConfig]) -> Result<Vec<ProductOutcome>> {
        let mut outcomes = Vec::with_capacity(products.len());

        for product in products {
            match self.update_product(product).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) if self.keep_going && !is_batch_fatal(&e) => {
                    error!("Update of {} failed: {:#}", product.name, e);
                    outcomes.push(ProductOutcome::Failed {
                        name: product.name.clone(),
                        reason: format!("{e:#}"),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcomes)
    }

    async fn update_product(&self, product: &ProductConfig) -> Result<ProductOutcome> {
        if let Some(reason) = product.skip_reason() {
            debug!("Skipping {}: {}", product.name, reason);
            return Ok(ProductOutcome::Skipped {
                name: product.name.clone(),
                reason: reason.to_string(),
            });
        }

        let release = self.catalog.latest_release(product).await?;
        let install_dir = product.install_dir();

        let marker = match InstalledMarker::read_from(&install_dir) {
            Ok(marker) => marker,
            Err(e) => {
                debug!("Treating {} as not installed: {}", product.name, e);
                None
            }
        };

        if !needs_update(marker.as_ref(), &release.build) {
            info!("{} is already up-to-date", product.name);
            return Ok(ProductOutcome::UpToDate {
                name: product.name.clone(),
                build: release.build,
            });
        }

        let workdir = scratch_dir(&product.dir)?;
        let archive_path = workdir.join(ARCHIVE_FILE);

        info!("Downloading {} {} ({})", product.name, release.build, release.download_url);
        self.downloader.fetch(&release.download_url, &archive_path).await.map_err(|e| {
            ToolupError::DownloadFailed {
                product: product.name.clone(),
                url: release.download_url.clone(),
                reason: format!("{e:#}"),
            }
        })?;

        info!("Removing existing {} installation if present", product.name);
        let old_install = install_dir.clone();
        tokio::task::spawn_blocking(move || remove_dir_all_quiet(&old_install))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error during removal: {}", e))?;

        if let Some(spec) = &product.chmod {
            let mode = match parse_mode(spec) {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("Invalid permission spec for {}: {}", product.name, e);
                    e.partial_mode
                }
            };
            if let Err(e) = create_dir_with_mode(&install_dir, mode) {
                warn!("Could not pre-create {} (mode {:o}): {}", install_dir.display(), mode, e);
            }
        }

        info!("Extracting {} {}", product.name, release.build);
        let archive = archive_path.clone();
        let destination = install_dir.clone();
        let extracted =
            tokio::task::spawn_blocking(move || extract_tar_gz(&archive, &destination))
                .await
                .map_err(|e| anyhow::anyhow!("Task join error during extraction: {}", e))??;
        debug!(
            "Extracted {} files and {} directories ({} bytes) for {}",
            extracted.files, extracted.dirs, extracted.bytes, product.name
        );

        InstalledMarker::new(product.label(), &release.build).write_to(&install_dir)?;

        let scratch = workdir.clone();
        tokio::task::spawn_blocking(move || remove_dir_all_quiet(&scratch))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error during cleanup: {}", e))?;

        info!("{} {} was installed", product.name, release.build);
        Ok(ProductOutcome::Updated {
            name: product.name.clone(),
            build: release.build,
        })
    }
}

/// Creates the per-product scratch directory `<dir>-<random>` under the
/// system temp dir.
///
/// The directory is deliberately not registered for automatic cleanup: a
/// fatal abort leaves it behind for inspection, and the success path
/// removes it explicitly.
fn scratch_dir(dir: &Path) -> Result<PathBuf> {
    let prefix = format!("{}-", dir.display());
    let tempdir = tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir()
        .map_err(ToolupError::IoError)?;
    Ok(tempdir.keep())
}

/// Catalog problems poison the whole batch even under `--keep-going`;
/// per-product download and install problems do not.
fn is_batch_fatal(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<ToolupError>(),
        Some(
            ToolupError::CatalogQueryFailed { .. }
                | ToolupError::CatalogMalformed { .. }
                | ToolupError::ConfigUnreadable { .. }
                | ToolupError::ConfigMalformed { .. }
        )
    )
}
