//! # Index Maintainer
//!
//! Ordered, append-only lists of record numbers kept under fixed keys:
//! the master agreement and invoice lists, the per-agreement invoice lists
//! and the invoice to document correlation lists.
//!
//! Lists are never deduplicated or bounded. An absent or unreadable list is
//! treated as empty.

use crate::errors::LedgerError;
use crate::ports::outbound::LedgerStore;
use crate::store::batch::StagedWrites;
use tracing::warn;

/// Decode a stored list. Malformed content reads as an empty list.
#[must_use]
pub fn decode_list(key: &str, bytes: Option<&[u8]>) -> Vec<String> {
    let Some(bytes) = bytes else {
        return Vec::new();
    };
    match serde_json::from_slice(bytes) {
        Ok(list) => list,
        Err(e) => {
            warn!(key, error = %e, "Malformed index, reading as empty");
            Vec::new()
        }
    }
}

/// Read the list stored under `key`.
pub fn read_list<S: LedgerStore + ?Sized>(
    view: &StagedWrites<'_, S>,
    key: &str,
) -> Result<Vec<String>, LedgerError> {
    let bytes = view.get(key)?;
    Ok(decode_list(key, bytes.as_deref()))
}

/// Append `entries` to the list under `key` and stage the result.
///
/// Returns the list as staged.
pub fn append<S: LedgerStore + ?Sized>(
    view: &mut StagedWrites<'_, S>,
    key: &str,
    entries: &[&str],
) -> Result<Vec<String>, LedgerError> {
    let mut list = read_list(view, key)?;
    list.extend(entries.iter().map(|e| (*e).to_string()));
    view.put(key, serde_json::to_vec(&list)?);
    Ok(list)
}

/// Stage an empty list under `key` unless something is already stored there.
///
/// Returns true if the list was seeded.
pub fn seed<S: LedgerStore + ?Sized>(
    view: &mut StagedWrites<'_, S>,
    key: &str,
) -> Result<bool, LedgerError> {
    if view.contains(key)? {
        return Ok(false);
    }
    view.put(key, serde_json::to_vec(&Vec::<String>::new())?);
    Ok(true)
}
