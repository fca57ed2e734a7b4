//! Utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and quiet removals
//! - [`permissions`] - Octal permission spec parsing for install directories
//! - [`progress`] - Progress bars and spinners for long-running operations
//!
//! # Example
//!
//! ```rust,no_run
//! use toolup::utils::{ensure_dir, parse_mode, ProgressBar};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("/opt/idea"))?;
//! let mode = parse_mode("0755")?;
//! assert_eq!(mode, 0o755);
//!
//! let progress = ProgressBar::new_spinner();
//! progress.set_message("Working...");
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod permissions;
pub mod progress;

pub use fs::{atomic_write, create_dir_with_mode, ensure_dir, remove_dir_all_quiet};
pub use permissions::{PermissionSpecError, PermissionSpecReason, parse_mode};
pub use progress::{ProgressBar, ProgressStyle};
