use crate::errors::StoreError;
use crate::ports::outbound::LedgerStore;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

/// In-memory implementation of [`LedgerStore`].
///
/// `batch_put` applies all writes under one lock, so a batch is either fully
/// visible or not at all. A write budget can be set to simulate a store that
/// starts failing partway through an operation.
pub struct InMemoryLedgerStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    /// Remaining key writes before every write fails; `None` means unlimited.
    write_budget: Mutex<Option<usize>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            write_budget: Mutex::new(None),
        }
    }

    /// Allow `writes` more key writes, then fail with [`StoreError::Unavailable`].
    pub fn fail_writes_after(&self, writes: usize) {
        *self.write_budget.lock() = Some(writes);
    }

    /// Remove any write budget.
    pub fn heal(&self) {
        *self.write_budget.lock() = None;
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of every stored entry.
    pub fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.entries.read().clone()
    }

    fn reserve_writes(&self, count: usize) -> Result<(), StoreError> {
        let mut budget = self.write_budget.lock();
        match budget.as_mut() {
            Some(remaining) if *remaining < count => Err(StoreError::Unavailable),
            Some(remaining) => {
                *remaining -= count;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.reserve_writes(1)?;
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn batch_put(&self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        self.reserve_writes(writes.len())?;
        let mut entries = self.entries.write();
        for (key, value) in writes {
            entries.insert(key, value);
        }
        Ok(())
    }
}
