//! toolup - batch updater for JetBrains-style IDE installations
//!
//! toolup keeps a set of locally installed tools (IDEs and similar
//! tarball-distributed products) on their newest builds. A single JSON config
//! file lists the products; one run checks the vendor's release catalogs and
//! replaces every outdated installation in place.
//!
//! # How an Update Works
//!
//! For each product in `toolup.json`, one update pass:
//! 1. Asks a release catalog for the newest build on the product's channel
//! 2. Compares it against the build recorded in the install marker
//!    (`build.txt` inside the install directory)
//! 3. Downloads the new build's tarball into a scratch directory
//! 4. Removes the old installation and extracts the tarball in its place,
//!    stripping the archive's wrapping top-level directory
//! 5. Writes the new install marker and cleans up the scratch directory
//!
//! The download completes before the old installation is touched, so a failed
//! transfer never costs a working install. Markers make the check cheap: an
//! up-to-date product costs one catalog query and one file read.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`update`, `outdated`, `init`)
//! - [`config`] - The `toolup.json` product list
//! - [`catalog`] - Release catalogs answering "what is the newest build"
//! - [`updater`] - Update pipeline: markers, decisions, orchestration
//! - [`download`] - Streaming archive downloads with progress reporting
//! - [`archive`] - Tarball extraction with top-level directory stripping
//! - [`core`] - Error types and user-facing error presentation
//! - [`utils`] - File system helpers, permission parsing, progress bars
//!
//! # Config Format (toolup.json)
//!
//! ```json
//! [
//!   {
//!     "name": "IntelliJ IDEA Ultimate",
//!     "download_url": "https://download.jetbrains.com/idea/ideaIU-{build}.tar.gz",
//!     "parent_dir": "/opt/jetbrains",
//!     "dir": "idea",
//!     "chmod": "0755"
//!   },
//!   {
//!     "name": "CLion",
//!     "code": "CL",
//!     "channel": "release",
//!     "parent_dir": "/opt/jetbrains",
//!     "dir": "clion"
//!   }
//! ]
//! ```
//!
//! Products with a `code` resolve through the vendor's releases endpoint,
//! which hands back ready-made download links. Products without one are
//! looked up by name in the combined XML update feed and need a
//! `download_url` template.
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Update everything (bare invocation defaults to `update`)
//! toolup
//!
//! # Keep going past per-product failures
//! toolup update --keep-going
//!
//! # Report available updates without installing
//! toolup outdated
//! toolup outdated --check --format json
//!
//! # Write a starter config
//! toolup init
//! ```

// Core functionality modules
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod updater;

// Fetching and unpacking
pub mod archive;
pub mod download;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
