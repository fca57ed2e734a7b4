//! Update workflow
//!
//! Everything between "here is the product list" and "the new builds are
//! on disk": the install marker ([`marker`]), the should-we-update rule
//! ([`decision`]), and the orchestrator that strings catalog, downloader,
//! and extractor together ([`orchestrator`]).

pub mod decision;
pub mod marker;
pub mod orchestrator;

pub use decision::needs_update;
pub use marker::{InstalledMarker, MARKER_FILE};
pub use orchestrator::{ProductOutcome, UpdateOrchestrator};
