//! Progress indicators
//!
//! Consistent progress bars and spinners for the update pipeline, wrapping
//! the `indicatif` crate. Indicators automatically disable themselves when
//! the `TOOLUP_NO_PROGRESS` environment variable is set (the CLI sets it for
//! `--no-progress`), keeping output clean in scripts and CI.
//!
//! # Examples
//!
//! ```rust
//! use toolup::utils::progress::ProgressBar;
//!
//! let spinner = ProgressBar::new_spinner();
//! spinner.set_message("Querying catalog...");
//! // ... long-running operation ...
//! spinner.finish_and_clear();
//! ```
//!
//! Download-style bars show bytes transferred instead of raw positions:
//!
//! ```rust
//! use toolup::utils::progress::ProgressBar;
//!
//! // Content-Length known: bounded byte bar. Unknown: byte spinner.
//! let bar = ProgressBar::new_download(Some(1024 * 1024));
//! bar.inc(512 * 1024);
//! bar.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress bars should be disabled.
///
/// Progress bars are disabled when the `TOOLUP_NO_PROGRESS` environment
/// variable is set to any value.
fn is_progress_disabled() -> bool {
    std::env::var("TOOLUP_NO_PROGRESS").is_ok()
}

/// A progress bar with consistent styling.
///
/// Wraps `indicatif` with toolup's styling and behavior. When progress is
/// disabled via the environment, every constructor returns a hidden bar
/// that silently ignores all operations.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a new progress bar with a known total length.
    pub fn new(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a spinner for indeterminate operations.
    ///
    /// The spinner animates every 100ms until finished.
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a byte-styled bar for downloads.
    ///
    /// With a known content length this is a bounded bar showing
    /// `bytes/total_bytes`; without one it degrades to a spinner that counts
    /// bytes as they arrive.
    pub fn new_download(len: Option<u64>) -> Self {
        if is_progress_disabled() {
            return Self {
                inner: IndicatifBar::hidden(),
            };
        }
        let bar = match len {
            Some(len) => {
                let bar = IndicatifBar::new(len);
                bar.set_style(ProgressStyle::download());
                bar
            }
            None => {
                let bar = IndicatifBar::new_spinner();
                bar.set_style(byte_spinner_style());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        Self {
            inner: bar,
        }
    }

    /// Sets the message displayed alongside the bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Sets the prefix displayed before the bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Increments the bar by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Sets the absolute position.
    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    /// Finishes the bar, replacing it with a completion message.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Finishes the bar and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Pre-configured styles for toolup progress indicators.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Default bar: position, total and ETA with a 40-char cyan/blue bar.
    pub fn default_style() -> IndicatifStyle {
        default_style()
    }

    /// Spinner style with Braille animation frames.
    pub fn spinner() -> IndicatifStyle {
        spinner_style()
    }

    /// Byte-oriented style for downloads and transfers.
    ///
    /// ```text
    /// 📥 [━━━━━━━━╸                              ] 52.4MB/210.1MB (00:41)
    /// ```
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("━╸━")
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap()
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {msg}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

fn byte_spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {msg} {bytes}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Creates a spinner with an initial message for quick use.
pub fn spinner_with_message(msg: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(msg);
    spinner
}
