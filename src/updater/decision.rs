//! Update decision rule
//!
//! Build identifiers are opaque text and are ordered by plain byte-wise
//! comparison, the same ordering the catalog uses to pick the newest build.
//! That makes `"9"` sort after `"10"`, which is wrong for humans but
//! consistent for the pair of builds this tool ever compares (same product,
//! same versioning scheme, dotted numeric segments of equal width in
//! practice). The rule lives here so a numeric-aware comparator could be
//! swapped in without touching the update workflow.

use super::marker::InstalledMarker;

/// Returns `true` when the candidate build should be installed.
///
/// No marker means no prior installation, which always updates. With a
/// marker, the product is considered up to date when the installed build is
/// byte-wise greater than or equal to the candidate.
#[must_use]
pub fn needs_update(marker: Option<&InstalledMarker>, candidate: &str) -> bool {
    match marker {
        None => true,
        Some(marker) => marker.build.as_str() < candidate,
    }
}
