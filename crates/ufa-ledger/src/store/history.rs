//! # Transaction History Log
//!
//! Per-agreement audit trail: every payload applied to an agreement
//! (creation payload first, then each patch as supplied) in order.
//! Entries are never rewritten or pruned.

use crate::domain::value_objects::RawRecord;
use crate::errors::LedgerError;
use crate::ports::outbound::LedgerStore;
use crate::store::batch::StagedWrites;

/// Read the log stored under `key`. An absent log is empty.
///
/// # Errors
///
/// - `Serialization`: the stored log cannot be decoded
pub fn read<S: LedgerStore + ?Sized>(
    view: &StagedWrites<'_, S>,
    key: &str,
) -> Result<Vec<RawRecord>, LedgerError> {
    match view.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
            LedgerError::Serialization(format!("transaction history {key}: {e}"))
        }),
        None => Ok(Vec::new()),
    }
}

/// Append `entry` to the log under `key` and stage the result.
///
/// Returns the new log length.
pub fn append<S: LedgerStore + ?Sized>(
    view: &mut StagedWrites<'_, S>,
    key: &str,
    entry: &RawRecord,
) -> Result<usize, LedgerError> {
    let mut log = read(view, key)?;
    log.push(entry.clone());
    view.put(key, serde_json::to_vec(&log)?);
    Ok(log.len())
}
