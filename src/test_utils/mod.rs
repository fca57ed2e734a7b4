//! Test utilities for toolup
//!
//! This module provides utilities for writing tests: one-time tracing
//! initialization and fixture builders for installer archives, config files,
//! and catalog documents.
//!
//! It is compiled for unit tests and, behind the `test-utils` feature, for
//! the integration suite, which depends on the crate with that feature
//! enabled.

pub mod fixtures;

pub use fixtures::{ConfigFixture, TarGzFixture, sample_feed_xml, sample_releases_json};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// This function initializes the tracing subscriber for tests, but only once
/// regardless of how many times it's called. It respects the `RUST_LOG`
/// environment variable if set, or uses the provided log level.
///
/// # Example
///
/// ```rust,no_run
/// use tracing::Level;
///
/// fn my_test() {
///     // Use environment variable
///     toolup::test_utils::init_test_logging(None);
///
///     // Or set level programmatically
///     toolup::test_utils::init_test_logging(Some(Level::DEBUG));
/// }
/// ```
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // No logging if neither is provided
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
