//! Installed-build marker file
//!
//! Each installation directory carries a `build.txt` whose single line
//! `<label>-<build>` records what is currently installed. The label is the
//! product code when one is configured, otherwise the product name. The
//! file is rewritten after every successful install and is the only
//! persistent state this tool keeps.

use anyhow::Result;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::core::ToolupError;
use crate::utils::atomic_write;

/// Marker file name inside an installation directory.
pub const MARKER_FILE: &str = "build.txt";

/// The `<label>-<build>` pair recorded for an installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledMarker {
    pub label: String,
    pub build: String,
}

impl InstalledMarker {
    pub fn new(label: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            build: build.into(),
        }
    }

    /// Parses marker content.
    ///
    /// The whole content must split on `-` into exactly two fields; no
    /// trimming is applied, so a trailing newline becomes part of the build
    /// field. Anything else (including a label that itself contains a
    /// hyphen) is `None`.
    #[must_use]
    pub fn parse(content: &str) -> Option<Self> {
        let fields: Vec<&str> = content.split('-').collect();
        match fields.as_slice() {
            [label, build] => Some(Self::new(*label, *build)),
            _ => None,
        }
    }

    /// Reads the marker from `install_dir`.
    ///
    /// A missing file is the normal fresh-install case and comes back as
    /// `Ok(None)`. Any other read problem, and content that is not in
    /// `<label>-<build>` form, is a [`ToolupError::MarkerUnreadable`];
    /// callers decide whether that is fatal (the updater treats it as "no
    /// prior installation").
    pub fn read_from(install_dir: &Path) -> Result<Option<Self>, ToolupError> {
        let path = install_dir.join(MARKER_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ToolupError::MarkerUnreadable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        match Self::parse(&content) {
            Some(marker) => Ok(Some(marker)),
            None => Err(ToolupError::MarkerUnreadable {
                path: path.display().to_string(),
                reason: "content is not in <label>-<build> form".to_string(),
            }),
        }
    }

    /// Writes the marker into `install_dir`, replacing any previous one.
    pub fn write_to(&self, install_dir: &Path) -> Result<()> {
        atomic_write(&install_dir.join(MARKER_FILE), self.to_string().as_bytes())
    }
}

impl fmt::Display for InstalledMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.label, self.build)
    }
}
