//! Configuration management for toolup
//!
//! The product list lives in a `toolup.json` file in the working directory
//! (overridable with `--config` or `TOOLUP_CONFIG`). The file is a JSON
//! array of product records, one per managed installation:
//!
//! ```json
//! [
//!   {
//!     "name": "IntelliJ IDEA Ultimate",
//!     "download_url": "https://download.jetbrains.com/idea/ideaIU-{build}.tar.gz",
//!     "parent_dir": "/opt/jetbrains",
//!     "dir": "idea",
//!     "chmod": "0755"
//!   }
//! ]
//! ```
//!
//! Products with a `code` are resolved through the per-product releases
//! endpoint; products without one are looked up by `name` in the combined
//! update feed and need a `download_url` template (`{build}` is substituted
//! with the selected build number).
//!
//! Unlike optional per-user settings, a missing config file is fatal: there
//! is nothing useful to do without a product list.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::ToolupError;

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "toolup.json";

/// Environment variable overriding the config file location.
///
/// The CLI sets this from `--config`, so everything downstream resolves the
/// same path without threading it through every call.
pub const CONFIG_ENV: &str = "TOOLUP_CONFIG";

/// Release channel a product tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    /// Early Access Program builds (the default).
    #[default]
    Eap,
    /// Stable releases.
    Release,
}

impl ReleaseChannel {
    /// Channel status string as the catalogs spell it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eap => "eap",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One managed product installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Display name; also the lookup key in the combined update feed.
    pub name: String,
    /// Product code for the releases endpoint. Routes the product there
    /// when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Download URL template for feed-resolved products, with a `{build}`
    /// placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Directory the installation directory lives under.
    pub parent_dir: PathBuf,
    /// Installation directory name under `parent_dir`.
    pub dir: PathBuf,
    /// Optional 4-digit octal mode for the installation directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chmod: Option<String>,
    #[serde(default)]
    pub channel: ReleaseChannel,
    /// Platform key for the releases endpoint's download table.
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_platform() -> String {
    "linux".to_string()
}

const fn default_enabled() -> bool {
    true
}

impl ProductConfig {
    /// Full path of the installation directory.
    #[must_use]
    pub fn install_dir(&self) -> PathBuf {
        self.parent_dir.join(&self.dir)
    }

    /// Label recorded in the install marker: the code when configured,
    /// otherwise the name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }

    /// Why this product should be skipped, or `None` if it is updatable.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&'static str> {
        if !self.enabled {
            return Some("disabled in config");
        }
        if self.parent_dir.as_os_str().is_empty() || self.dir.as_os_str().is_empty() {
            return Some("missing install directory configuration");
        }
        None
    }
}

/// The full product list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub products: Vec<ProductConfig>,
}

impl Config {
    /// Loads the product list from `TOOLUP_CONFIG` if set, otherwise from
    /// `toolup.json` in the current working directory.
    ///
    /// # Errors
    ///
    /// A missing or unreadable file is [`ToolupError::ConfigUnreadable`];
    /// invalid JSON or a non-array shape is
    /// [`ToolupError::ConfigMalformed`]. Both are fatal to the run.
    pub async fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path)).await;
        }
        Self::load_from(Path::new(CONFIG_FILE)).await
    }

    /// Loads the product list from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).await.map_err(|e| ToolupError::ConfigUnreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let config = serde_json::from_str(&content).map_err(|e| ToolupError::ConfigMalformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Writes the product list as pretty-printed JSON, creating parent
    /// directories as needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create config directory {}", parent.display())
                })?;
            }
        }

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Starter configuration written by `toolup init`.
    ///
    /// The entry carries placeholder paths that must be adjusted before the
    /// first run.
    #[must_use]
    pub fn example() -> Self {
        Self {
            products: vec![ProductConfig {
                name: "IntelliJ IDEA Ultimate".to_string(),
                code: None,
                download_url: Some(
                    "https://download.jetbrains.com/idea/ideaIU-{build}.tar.gz".to_string(),
                ),
                parent_dir: PathBuf::from("/opt/jetbrains"),
                dir: PathBuf::from("idea"),
                chmod: Some("0755".to_string()),
                channel: ReleaseChannel::Eap,
                platform: default_platform(),
                enabled: true,
            }],
        }
    }
}
