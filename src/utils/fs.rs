//! File system helpers
//!
//! Small safe wrappers used by the updater: directory creation, atomic file
//! writes for the install marker, and the best-effort removals the install
//! pipeline relies on. All functions return `anyhow::Result` with enough
//! context to name the path involved.
//!
//! # Examples
//!
//! ```rust
//! use toolup::utils::fs::{ensure_dir, atomic_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("target/demo"))?;
//! atomic_write(Path::new("target/demo/build.txt"), b"IIU-231.9414")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parents if necessary.
///
/// Returns an error if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// Content goes to a `.tmp` sibling first, is synced to disk, then renamed
/// over the target. Readers never see a partially written file. Parent
/// directories are created as needed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Removes a directory tree, tolerating failure.
///
/// Returns `true` if the tree is gone afterwards. A missing directory counts
/// as success; any other failure is logged at warn level and swallowed. The
/// install pipeline wipes old installations and temp directories this way
/// and carries on regardless.
pub fn remove_dir_all_quiet(path: &Path) -> bool {
    match fs::remove_dir_all(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
            false
        }
    }
}

/// Creates a directory with an explicit Unix mode.
///
/// Parents must already exist. On non-Unix platforms the mode is ignored.
#[cfg(unix)]
pub fn create_dir_with_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(mode).create(path)
}

/// Creates a directory with an explicit Unix mode.
///
/// Parents must already exist. On non-Unix platforms the mode is ignored.
#[cfg(not(unix))]
pub fn create_dir_with_mode(path: &Path, _mode: u32) -> std::io::Result<()> {
    fs::DirBuilder::new().create(path)
}
