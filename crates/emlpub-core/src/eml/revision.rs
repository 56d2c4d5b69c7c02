//! Package identifier revisions
//!
//! A package identifier such as `edi.1047.6` ends in a revision number.
//! Publishing a new version of a package bumps that last component.

use crate::errors::{EmlError, Result};

/// Increment the last dot-separated component of a package identifier.
///
/// All other components are kept as-is. The last component must be a run of
/// ASCII digits; the result is written without leading zeros.
///
/// ```
/// use emlpub_core::eml::increment_revision;
///
/// assert_eq!(increment_revision("edi.1.5").unwrap(), "edi.1.6");
/// assert_eq!(increment_revision("edi.1.9").unwrap(), "edi.1.10");
/// ```
///
/// # Errors
///
/// `EmlError::Format` if the last component is empty, signed, fractional,
/// non-numeric, or already at `u64::MAX`.
pub fn increment_revision(id: &str) -> Result<String> {
    let (prefix, last) = match id.rsplit_once('.') {
        Some((prefix, last)) => (Some(prefix), last),
        None => (None, id),
    };

    let next = parse_revision(id, last)?
        .checked_add(1)
        .ok_or_else(|| format_error(id, "revision number overflows"))?;

    Ok(match prefix {
        Some(prefix) => format!("{}.{}", prefix, next),
        None => next.to_string(),
    })
}

/// The numeric revision of a package identifier
///
/// # Errors
///
/// `EmlError::Format` under the same conditions as [`increment_revision`].
pub fn revision_of(id: &str) -> Result<u64> {
    let last = id.rsplit('.').next().unwrap_or(id);
    parse_revision(id, last)
}

fn parse_revision(id: &str, last: &str) -> Result<u64> {
    if last.is_empty() {
        return Err(format_error(id, "revision component is empty"));
    }
    // u64::from_str would also accept a leading '+'
    if !last.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error(
            id,
            &format!("revision component '{}' is not a base-10 integer", last),
        ));
    }
    last.parse::<u64>()
        .map_err(|e| format_error(id, &e.to_string()))
}

fn format_error(id: &str, reason: &str) -> EmlError {
    EmlError::Format {
        value: id.to_string(),
        reason: reason.to_string(),
    }
}
