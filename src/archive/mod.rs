//! Streaming tar.gz extraction
//!
//! Vendor installer archives wrap the whole installation in a single top
//! directory (`ideaIU-231.9414/bin/...`). [`extract_tar_gz`] unpacks an
//! archive into a destination while removing that wrapper, so the
//! installation lands directly in the target directory.
//!
//! The wrapper is inferred lazily: the first entry whose path contains a
//! separator fixes the prefix length (everything up to and including that
//! separator), and that many bytes are dropped from every subsequent entry
//! path. Entries seen before the prefix is known keep their full path. The
//! prefix is a length, not a name; archives that mix top-level directories
//! are outside the contract.
//!
//! Entries are streamed one at a time, never buffered whole. Only regular
//! files and directories are supported; any other entry type (symlink,
//! device, fifo) aborts the extraction at that entry, leaving whatever was
//! already written in place.

use anyhow::Result;
use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};
use tracing::{debug, trace};

use crate::core::ToolupError;

/// Counters reported by a successful extraction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// Regular files written.
    pub files: u64,
    /// Directory entries processed.
    pub dirs: u64,
    /// Total content bytes copied.
    pub bytes: u64,
}

/// Extracts a gzip-compressed tar archive into `destination`, stripping the
/// archive's top-level directory.
///
/// Directory entries are created with their recorded mode; directories that
/// already exist are left untouched. File entries get their parents created
/// on demand and are written create-or-truncate with their recorded mode.
/// Modes apply on Unix only.
///
/// # Errors
///
/// Fails with [`ToolupError::UnsupportedArchiveEntry`] on the first entry
/// that is neither a regular file nor a directory, and with
/// [`ToolupError::ExtractionFailed`] for I/O problems and for entry paths
/// that would escape the destination. The first failure aborts the run; no
/// partial-success reporting.
pub fn extract_tar_gz(source: &Path, destination: &Path) -> Result<ExtractOutcome> {
    let file = fs::File::open(source).map_err(|e| extraction_failed(source, &e))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = Archive::new(decoder);

    let mut outcome = ExtractOutcome::default();
    // Byte length of the top-level wrapper, unknown until the first entry
    // with a separator shows up.
    let mut prefix_len: Option<usize> = None;

    let entries = archive.entries().map_err(|e| extraction_failed(source, &e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| extraction_failed(source, &e))?;
        let raw_name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();

        if prefix_len.is_none() {
            prefix_len = raw_name.find('/').map(|idx| idx + 1);
        }

        let relative = match prefix_len {
            Some(n) => raw_name.get(n..).unwrap_or(""),
            None => raw_name.as_str(),
        };
        let path = destination.join(checked_relative(relative, &raw_name)?);

        let kind = entry.header().entry_type();
        match kind {
            EntryType::Directory => {
                outcome.dirs += 1;
                if !path.exists() {
                    let mode = entry.header().mode().map_err(|e| extraction_failed(&path, &e))?;
                    fs::create_dir_all(&path).map_err(|e| extraction_failed(&path, &e))?;
                    set_unix_mode(&path, mode)?;
                    trace!("created directory {} (mode {:o})", path.display(), mode);
                }
            }
            EntryType::Regular => {
                if let Some(parent) = path.parent() {
                    if !parent.exists() {
                        fs::create_dir_all(parent).map_err(|e| extraction_failed(parent, &e))?;
                    }
                }

                let mode = entry.header().mode().map_err(|e| extraction_failed(&path, &e))?;
                let mut file =
                    open_for_entry(&path, mode).map_err(|e| extraction_failed(&path, &e))?;
                let copied =
                    io::copy(&mut entry, &mut file).map_err(|e| extraction_failed(&path, &e))?;

                outcome.files += 1;
                outcome.bytes += copied;
                trace!("wrote {} ({} bytes, mode {:o})", path.display(), copied, mode);
            }
            other => {
                return Err(ToolupError::UnsupportedArchiveEntry {
                    entry: raw_name,
                    kind: format!("{other:?}"),
                }
                .into());
            }
        }
    }

    debug!(
        "extracted {} into {}: {} files, {} dirs, {} bytes",
        source.display(),
        destination.display(),
        outcome.files,
        outcome.dirs,
        outcome.bytes
    );
    Ok(outcome)
}

/// Validates a stripped entry path before joining it onto the destination.
///
/// Plain names and `.` segments pass; anything that could climb out of the
/// destination (absolute paths, `..`, drive prefixes) is rejected.
fn checked_relative(relative: &str, raw_name: &str) -> Result<PathBuf> {
    let path = Path::new(relative);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(ToolupError::ExtractionFailed {
                    path: raw_name.to_string(),
                    reason: "entry path escapes the destination directory".to_string(),
                }
                .into());
            }
        }
    }
    Ok(path.to_path_buf())
}

fn extraction_failed(path: &Path, err: &dyn std::fmt::Display) -> ToolupError {
    ToolupError::ExtractionFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

#[cfg(unix)]
fn open_for_entry(path: &Path, mode: u32) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new().write(true).create(true).truncate(true).mode(mode).open(path)
}

#[cfg(not(unix))]
fn open_for_entry(path: &Path, _mode: u32) -> io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

#[cfg(unix)]
fn set_unix_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| extraction_failed(path, &e))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_unix_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
