//! Core types for toolup
//!
//! This module forms the foundation of toolup's type system. Today that means
//! the error architecture; everything else in the crate builds on it.
//!
//! # Error Management
//!
//! toolup separates developer ergonomics from end-user experience:
//! - **Strongly-typed errors** ([`ToolupError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions
//! - **Automatic conversion** from common library errors
//!
//! Every operation that can fail returns a [`Result`] with meaningful error
//! information; fatal errors end up in [`user_friendly_error`] for display.
//!
//! # Examples
//!
//! ```rust
//! use toolup::core::{ToolupError, user_friendly_error};
//!
//! fn example_operation() -> anyhow::Result<String> {
//!     Err(ToolupError::ConfigUnreadable {
//!         path: "toolup.json".to_string(),
//!         reason: "No such file or directory".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     friendly.display(); // Colored error with suggestions
//! }
//! ```
//!
//! [`Result`]: std::result::Result

pub mod error;

pub use error::{ErrorContext, ToolupError, user_friendly_error};
