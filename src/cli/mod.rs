//! Command-line interface for toolup.
//!
//! Each subcommand lives in its own module with its own argument struct and
//! execution logic. Global flags (verbosity, progress, config path) are parsed
//! here and applied to the process environment before any command runs, so the
//! rest of the crate reads them from one place.
//!
//! # Available Commands
//!
//! - `update` - Update every configured product to its newest build (the
//!   default when no subcommand is given)
//! - `outdated` - Report which products have newer builds, without installing
//! - `init` - Write a starter `toolup.json`
//!
//! # Usage Examples
//!
//! ```bash
//! # Update everything listed in ./toolup.json
//! toolup
//!
//! # Keep updating the remaining products when one fails
//! toolup update --keep-going
//!
//! # Machine-readable update check for CI
//! toolup outdated --check --format json
//!
//! # Verbose run against an alternate config
//! toolup --verbose --config ~/jetbrains/toolup.json update
//! ```

mod init;
mod outdated;
mod update;


use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Configuration derived from the global CLI flags.
///
/// Built once from the parsed arguments and applied to the process
/// environment before command dispatch. Tests construct one directly instead
/// of going through argument parsing.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the `RUST_LOG` filter, `None` leaves the environment
    /// untouched.
    pub log_level: Option<String>,
    /// Disable progress bars and spinners.
    pub no_progress: bool,
    /// Config file path override.
    pub config_path: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies this configuration to the process environment.
    ///
    /// Sets `RUST_LOG`, `TOOLUP_NO_PROGRESS` and `TOOLUP_CONFIG` so the
    /// logging filter, progress indicators and config loading all see the
    /// flags without having them threaded through every call.
    pub fn apply_to_env(&self) {
        // SAFETY: runs during startup, before the commands spawn tasks that
        // could read the environment concurrently
        unsafe {
            if let Some(level) = &self.log_level {
                std::env::set_var("RUST_LOG", level);
            }
            if self.no_progress {
                std::env::set_var("TOOLUP_NO_PROGRESS", "1");
            }
            if let Some(config) = &self.config_path {
                std::env::set_var(crate::config::CONFIG_ENV, config);
            }
        }
    }
}

/// Batch updater for JetBrains-style IDE installations.
#[derive(Parser)]
#[command(
    name = "toolup",
    about = "Keep locally installed JetBrains tools on their newest builds",
    version,
    long_about = "toolup reads a product list from toolup.json, asks the vendor's release \
                  catalogs for the newest build of each product, and replaces any outdated \
                  installation with a freshly downloaded and extracted one. Running it with \
                  no subcommand performs a full update pass."
)]
pub struct Cli {
    /// Subcommand to run, defaults to `update` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug level logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the product config file (defaults to ./toolup.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable progress bars and spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Update every configured product to its newest build.
    ///
    /// See [`update::UpdateCommand`] for detailed options and behavior.
    Update(update::UpdateCommand),

    /// Show which products have newer builds available, without installing.
    ///
    /// See [`outdated::OutdatedCommand`] for detailed options and behavior.
    Outdated(outdated::OutdatedCommand),

    /// Write a starter toolup.json config file.
    ///
    /// See [`init::InitCommand`] for detailed options and behavior.
    Init(init::InitCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from the parsed arguments.
    ///
    /// This is the entry point used by `main`. It translates the global flags
    /// into a [`CliConfig`] and delegates to
    /// [`execute_with_config`](Self::execute_with_config).
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed global flags.
    ///
    /// `--verbose` maps to debug level logging, `--quiet` to errors only,
    /// and the default is info. The parser enforces that the two flags are
    /// mutually exclusive.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration, for tests and embedding.
    ///
    /// Applies the configuration to the environment, installs the logging
    /// subscriber, and dispatches to the selected subcommand. A bare `toolup`
    /// invocation runs a full update pass.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        // Apply configuration to environment once at the start
        config.apply_to_env();
        init_logging();

        let command =
            self.command.unwrap_or_else(|| Commands::Update(update::UpdateCommand::default()));

        match command {
            Commands::Update(cmd) => cmd.execute().await,
            Commands::Outdated(cmd) => cmd.execute().await,
            Commands::Init(cmd) => cmd.execute().await,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` (set from `--verbose`/`--quiet` a moment earlier) takes
/// precedence; without it, crate-level info logging is the default. Log lines
/// go to stderr so that structured stdout output like `outdated --format
/// json` stays machine-readable. Repeated initialization is tolerated so
/// embedded and test invocations can call through here more than once.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toolup=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
