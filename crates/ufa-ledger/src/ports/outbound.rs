//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the ledger service depends on:
//! - The key-value ledger store (replication and commit ordering live behind it)
//! - An observer that receives every committed or rejected operation
//!
//! ## Concurrency
//!
//! The hosting platform serializes invocations that touch overlapping keys.
//! Adapters only need to be safe to share; no cross-call locking is expected.

use crate::errors::StoreError;
use crate::events::LedgerEvent;

// =============================================================================
// LEDGER STORE
// =============================================================================

/// Byte-blob storage addressed by string keys.
///
/// The service never range-scans: every membership question is answered
/// through explicit index records.
pub trait LedgerStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - A value is stored
    /// * `None` - Nothing was ever written under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Apply several writes as one unit.
    ///
    /// The default replays the writes in order and stops at the first
    /// failure; adapters that can commit atomically should override it.
    fn batch_put(&self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        for (key, value) in writes {
            self.put(&key, value)?;
        }
        Ok(())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn batch_put(&self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        (**self).batch_put(writes)
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Receives a [`LedgerEvent`] for each operation outcome.
///
/// Called after the store commit, so an observer never sees an event for
/// writes that did not happen.
pub trait LedgerObserver: Send + Sync {
    fn on_event(&self, event: &LedgerEvent);
}
