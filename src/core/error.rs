//! Error handling for toolup
//!
//! This module provides the error types and user-friendly error reporting for
//! the updater. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`ToolupError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Configuration**: [`ToolupError::ConfigUnreadable`], [`ToolupError::ConfigMalformed`]
//! - **Catalog**: [`ToolupError::CatalogQueryFailed`], [`ToolupError::CatalogMalformed`]
//! - **Transfer**: [`ToolupError::DownloadFailed`]
//! - **Installation**: [`ToolupError::InvalidPermissionSpec`],
//!   [`ToolupError::UnsupportedArchiveEntry`], [`ToolupError::ExtractionFailed`],
//!   [`ToolupError::MarkerUnreadable`]
//!
//! Common library errors are converted automatically:
//! - [`std::io::Error`] → [`ToolupError::IoError`]
//! - [`reqwest::Error`] → [`ToolupError::HttpError`]
//! - [`serde_json::Error`] → [`ToolupError::JsonError`]
//! - [`serde_xml_rs::Error`] → [`ToolupError::XmlError`]
//!
//! Use [`user_friendly_error`] to convert any error into a displayable format
//! with contextual suggestions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use toolup::core::{ToolupError, user_friendly_error};
//!
//! fn load_products() -> Result<(), ToolupError> {
//!     Err(ToolupError::ConfigUnreadable {
//!         path: "toolup.json".to_string(),
//!         reason: "No such file or directory".to_string(),
//!     })
//! }
//!
//! if let Err(e) = load_products() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // Colored error with suggestions on stderr
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for toolup operations
///
/// Each variant represents a specific failure mode and carries the context
/// needed to tell the operator which product, path, or URL was involved.
/// Messages are written for end users, not just developers.
#[derive(Error, Debug)]
pub enum ToolupError {
    /// Configuration file could not be read from disk
    ///
    /// The product list is mandatory; a run cannot proceed without it, so
    /// this error is always fatal.
    #[error("Cannot read config file: {path}")]
    ConfigUnreadable {
        /// Path to the configuration file that could not be read
        path: String,
        /// The underlying I/O failure
        reason: String,
    },

    /// Configuration file exists but does not parse as a product list
    #[error("Invalid config file syntax in {path}")]
    ConfigMalformed {
        /// Path to the configuration file that failed to parse
        path: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// The release catalog could not be queried
    ///
    /// Covers transport failures and non-success HTTP statuses while
    /// fetching the update feed or the releases endpoint.
    #[error("Catalog query failed for '{product}'")]
    CatalogQueryFailed {
        /// Product whose catalog lookup failed
        product: String,
        /// The catalog URL that was queried
        url: String,
        /// Reason for the failure
        reason: String,
    },

    /// The catalog answered but its content is unusable for this product
    ///
    /// Raised when the product is missing from the feed, has no builds on
    /// the requested channel, or lacks a download link for the platform.
    #[error("Catalog entry for '{product}' is unusable: {reason}")]
    CatalogMalformed {
        /// Product whose catalog entry is unusable
        product: String,
        /// What exactly was missing or malformed
        reason: String,
    },

    /// Archive download failed
    #[error("Download failed for '{product}'")]
    DownloadFailed {
        /// Product whose archive failed to download
        product: String,
        /// The download URL
        url: String,
        /// Reason for the failure
        reason: String,
    },

    /// Permission spec in the configuration is not a 4-digit octal value
    #[error("Invalid permission spec '{spec}': {reason}")]
    InvalidPermissionSpec {
        /// The offending spec string
        spec: String,
        /// Why it was rejected
        reason: String,
    },

    /// Archive contains an entry type the extractor does not handle
    ///
    /// Only regular files and directories are extracted. Symlinks, devices
    /// and other entry types abort the extraction immediately.
    #[error("Unsupported archive entry type for '{entry}': {kind}")]
    UnsupportedArchiveEntry {
        /// Path of the entry inside the archive
        entry: String,
        /// Human-readable entry type
        kind: String,
    },

    /// Archive extraction failed partway through
    #[error("Archive extraction failed: {path}")]
    ExtractionFailed {
        /// The archive or destination path involved
        path: String,
        /// Reason for the failure
        reason: String,
    },

    /// Installed-build marker exists but could not be read
    ///
    /// Recovered locally by the updater (the product is treated as not
    /// installed); surfaces only when something else goes wrong too.
    #[error("Cannot read install marker: {path}")]
    MarkerUnreadable {
        /// Path to the marker file
        path: String,
        /// Reason it could not be read
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlError(#[from] serde_xml_rs::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for ToolupError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigUnreadable {
                path,
                reason,
            } => Self::ConfigUnreadable {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ConfigMalformed {
                path,
                reason,
            } => Self::ConfigMalformed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::CatalogQueryFailed {
                product,
                url,
                reason,
            } => Self::CatalogQueryFailed {
                product: product.clone(),
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::CatalogMalformed {
                product,
                reason,
            } => Self::CatalogMalformed {
                product: product.clone(),
                reason: reason.clone(),
            },
            Self::DownloadFailed {
                product,
                url,
                reason,
            } => Self::DownloadFailed {
                product: product.clone(),
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::InvalidPermissionSpec {
                spec,
                reason,
            } => Self::InvalidPermissionSpec {
                spec: spec.clone(),
                reason: reason.clone(),
            },
            Self::UnsupportedArchiveEntry {
                entry,
                kind,
            } => Self::UnsupportedArchiveEntry {
                entry: entry.clone(),
                kind: kind.clone(),
            },
            Self::ExtractionFailed {
                path,
                reason,
            } => Self::ExtractionFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::MarkerUnreadable {
                path,
                reason,
            } => Self::MarkerUnreadable {
                path: path.clone(),
                reason: reason.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::HttpError(e) => Self::Other {
                message: format!("HTTP error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON parsing error: {e}"),
            },
            Self::XmlError(e) => Self::Other {
                message: format!("XML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`ToolupError`] and adds optional suggestions for
/// resolution and additional details. This is the primary way toolup presents
/// errors to CLI users.
///
/// # Display Format
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use toolup::core::{ToolupError, ErrorContext};
///
/// let context = ErrorContext::new(ToolupError::ConfigUnreadable {
///     path: "toolup.json".to_string(),
///     reason: "missing".to_string(),
/// })
/// .with_suggestion("Run 'toolup init' to create a starter config")
/// .with_details("The product list is required for every run");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying toolup error
    pub error: ToolupError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`ToolupError`]
    ///
    /// Use the builder methods [`with_suggestion`] and [`with_details`] to
    /// add user-friendly information.
    ///
    /// [`with_suggestion`]: ErrorContext::with_suggestion
    /// [`with_details`]: ErrorContext::with_details
    #[must_use]
    pub const fn new(error: ToolupError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps. They are displayed in green
    /// in the terminal to draw attention.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details provide context about why the error occurred. Displayed in
    /// yellow, less prominent than the main error or suggestion.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Create an [`ErrorContext`] with only a suggestion (no specific error)
    pub fn suggestion(suggestion: impl Into<String>) -> Self {
        Self {
            error: ToolupError::Other {
                message: String::new(),
            },
            suggestion: Some(suggestion.into()),
            details: None,
        }
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// Error message in red and bold, details in yellow, suggestion in
    /// green. This is how toolup presents fatal errors in the CLI.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// This function is the main entry point for converting arbitrary errors into
/// user-friendly messages for CLI display. It recognizes [`ToolupError`]
/// variants, [`std::io::Error`] kinds and [`serde_json::Error`], and provides
/// appropriate context for each; anything else is shown with its full error
/// chain.
///
/// # Examples
///
/// ```rust,no_run
/// use toolup::core::user_friendly_error;
/// use std::io::{Error, ErrorKind};
///
/// let io_error = Error::new(ErrorKind::PermissionDenied, "access denied");
/// let ctx = user_friendly_error(anyhow::Error::from(io_error));
///
/// ctx.display(); // Shows permission-related suggestions
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(toolup_error) = error.downcast_ref::<ToolupError>() {
        return create_error_context(toolup_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ToolupError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion(
                    "Check ownership of the installation directory, or run with elevated permissions",
                )
                .with_details(
                    "toolup needs write access to the installation parent directory and the system temp directory",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ToolupError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the path exists and is spelled correctly")
                .with_details("A required file or directory could not be found");
            }
            std::io::ErrorKind::StorageFull => {
                return ErrorContext::new(ToolupError::Other {
                    message: format!("Disk full: {io_error}"),
                })
                .with_suggestion(
                    "Free disk space; installer archives and extracted trees can run to hundreds of megabytes",
                );
            }
            _ => {}
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(ToolupError::ConfigMalformed {
            path: "toolup.json".to_string(),
            reason: json_error.to_string(),
        })
        .with_suggestion(
            "Check the JSON syntax. The config must be an array of product entries",
        )
        .with_details(
            "JSON parse errors are usually caused by trailing commas, missing quotes, or mismatched brackets",
        );
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ToolupError::Other {
        message,
    })
}

/// Create appropriate [`ErrorContext`] with suggestions for specific toolup errors
///
/// Maps each [`ToolupError`] variant to tailored suggestions and details.
/// Used by [`user_friendly_error`] to keep messages consistent.
fn create_error_context(error: ToolupError) -> ErrorContext {
    match &error {
        ToolupError::ConfigUnreadable { path, reason } => ErrorContext::new(ToolupError::ConfigUnreadable {
            path: path.clone(),
            reason: reason.clone(),
        })
            .with_suggestion(
                "Run 'toolup init' to create a starter config, or pass --config with the file's location",
            )
            .with_details(format!(
                "toolup reads the product list from {path} before doing anything else: {reason}"
            )),

        ToolupError::ConfigMalformed { path, reason } => ErrorContext::new(ToolupError::ConfigMalformed {
            path: path.clone(),
            reason: reason.clone(),
        })
            .with_suggestion(format!(
                "Check the JSON syntax in {path}. The file must contain an array of product entries"
            ))
            .with_details(reason.clone()),

        ToolupError::CatalogQueryFailed { product, url, reason } => ErrorContext::new(ToolupError::CatalogQueryFailed {
            product: product.clone(),
            url: url.clone(),
            reason: reason.clone(),
        })
            .with_suggestion(format!(
                "Check your internet connection and that {url} is reachable"
            ))
            .with_details(format!(
                "Querying the catalog for '{product}' failed: {reason}"
            )),

        ToolupError::CatalogMalformed { product, reason } => ErrorContext::new(ToolupError::CatalogMalformed {
            product: product.clone(),
            reason: reason.clone(),
        })
            .with_suggestion(format!(
                "Verify the name, code, channel and platform configured for '{product}' match the vendor catalog exactly"
            ))
            .with_details("The catalog answered, but no usable build could be selected from it"),

        ToolupError::DownloadFailed { product, url, reason } => ErrorContext::new(ToolupError::DownloadFailed {
            product: product.clone(),
            url: url.clone(),
            reason: reason.clone(),
        })
            .with_suggestion(
                "Check your internet connection and retry. The build may have rotated out of the channel since the catalog was published",
            )
            .with_details(format!("GET {url} failed: {reason}")),

        ToolupError::InvalidPermissionSpec { spec, reason } => ErrorContext::new(ToolupError::InvalidPermissionSpec {
            spec: spec.clone(),
            reason: reason.clone(),
        })
            .with_suggestion("Use a 4-digit octal value in the 'chmod' field, such as \"0755\"")
            .with_details(format!("'{spec}' was rejected: {reason}")),

        ToolupError::UnsupportedArchiveEntry { entry, kind } => ErrorContext::new(ToolupError::UnsupportedArchiveEntry {
            entry: entry.clone(),
            kind: kind.clone(),
        })
            .with_suggestion(
                "This archive cannot be installed by toolup; only regular files and directories are extracted",
            )
            .with_details(format!(
                "Entry '{entry}' has type {kind}. Extraction stopped at this entry, leaving a partial tree"
            )),

        ToolupError::ExtractionFailed { path, reason } => ErrorContext::new(ToolupError::ExtractionFailed {
            path: path.clone(),
            reason: reason.clone(),
        })
            .with_suggestion("Check free disk space and permissions on the installation directory")
            .with_details(format!("{path}: {reason}")),

        ToolupError::MarkerUnreadable { path, reason } => ErrorContext::new(ToolupError::MarkerUnreadable {
            path: path.clone(),
            reason: reason.clone(),
        })
            .with_suggestion(format!(
                "Delete {path} to force a fresh install; the marker is rewritten after every successful update"
            ))
            .with_details(reason.clone()),

        _ => ErrorContext::new(error.clone()),
    }
}
