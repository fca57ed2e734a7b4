//! Integration test suite for toolup
//!
//! End-to-end tests that exercise the complete binary against real config
//! files and mock HTTP catalogs, plus HTTP-level tests for the catalog and
//! download clients. Everything runs against wiremock servers and temp
//! directories; no external network access is needed.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: Argument handling, config resolution, init workflow
//! - **catalog_http**: Update feed and releases endpoint clients over HTTP
//! - **download_http**: Streaming downloader behavior
//! - **update_flow**: Full update passes through the binary, success and
//!   failure paths, and the outdated report against installed state

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod download_http;
mod update_flow;
