//! Octal permission spec parsing
//!
//! Product entries may carry a `chmod` field naming the mode for the
//! installation directory. The accepted form is exactly four octal digits
//! (`"0755"`, `"2750"`, ...), read as a base-8 numeral into a Unix mode
//! bitmask.
//!
//! Rejected input still yields a best-effort mode in
//! [`PermissionSpecError::partial_mode`]: each usable character contributes
//! its three low bits. The updater logs the error and applies that partial
//! mode rather than aborting, which is the behavior operators with sloppy
//! configs have come to rely on.

use thiserror::Error;

/// Why a permission spec was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PermissionSpecReason {
    /// The spec was not exactly four characters long.
    #[error("must be exactly 4 octal digits")]
    InvalidLength,
    /// A character outside `0`..`7` appeared in the spec.
    #[error("digit out of range, only 0-7 allowed")]
    DigitOutOfRange,
}

/// A rejected permission spec, with the best-effort mode that was
/// accumulated anyway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid permission spec '{spec}': {reason}")]
pub struct PermissionSpecError {
    /// The offending spec string.
    pub spec: String,
    /// Why it was rejected.
    pub reason: PermissionSpecReason,
    /// Mode assembled from whatever characters were usable. Lenient callers
    /// apply this instead of failing; it is never a reliable value.
    pub partial_mode: u32,
}

/// Parse a 4-digit octal permission spec into a mode bitmask.
///
/// `"0755"` parses to `0o755`, `"4755"` to `0o4755` (setuid bit). The spec
/// must be exactly four characters, each in `0`..`7`.
///
/// # Errors
///
/// [`PermissionSpecReason::InvalidLength`] when the spec is not four
/// characters, [`PermissionSpecReason::DigitOutOfRange`] when a character is
/// not an octal digit. Both carry the accumulated partial mode.
pub fn parse_mode(spec: &str) -> Result<u32, PermissionSpecError> {
    let mut mode: u32 = 0;
    let mut bad_digit = false;

    for ch in spec.chars() {
        match ch.to_digit(8) {
            Some(d) => mode = (mode << 3) | d,
            None => {
                bad_digit = true;
                // Out-of-range characters still feed the partial mode
                // through their low three bits.
                mode = (mode << 3) | ((ch as u32).wrapping_sub('0' as u32) & 0o7);
            }
        }
    }

    let reason = if spec.chars().count() != 4 {
        Some(PermissionSpecReason::InvalidLength)
    } else if bad_digit {
        Some(PermissionSpecReason::DigitOutOfRange)
    } else {
        None
    };

    match reason {
        None => Ok(mode),
        Some(reason) => Err(PermissionSpecError {
            spec: spec.to_string(),
            reason,
            partial_mode: mode,
        }),
    }
}
