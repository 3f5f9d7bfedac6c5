//! # Staged Writes
//!
//! Every mutating operation collects its writes here and commits them in one
//! step. Reads made through the overlay see writes staged earlier in the
//! same operation, so a later step (the running-total update after an
//! invoice pair, for instance) builds on the earlier ones.

use crate::errors::StoreError;
use crate::ports::outbound::LedgerStore;
use std::collections::HashMap;
use tracing::debug;

/// Write overlay over a store. Reads fall through to the store for keys
/// that have not been staged.
pub struct StagedWrites<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    /// Writes in first-staged order; restaging a key replaces its value in place.
    writes: Vec<(String, Vec<u8>)>,
    positions: HashMap<String, usize>,
}

impl<'a, S: LedgerStore + ?Sized> StagedWrites<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            writes: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Read `key`, preferring a staged value.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.positions.get(key) {
            Some(&pos) => Ok(Some(self.writes[pos].1.clone())),
            None => self.store.get(key),
        }
    }

    /// True if `key` has a staged or stored value.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.positions.contains_key(key) || self.store.get(key)?.is_some())
    }

    /// Stage a write of `value` under `key`.
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        match self.positions.get(key) {
            Some(&pos) => self.writes[pos].1 = value,
            None => {
                self.positions.insert(key.to_string(), self.writes.len());
                self.writes.push((key.to_string(), value));
            }
        }
    }

    /// Number of distinct keys staged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Keys staged so far, in staging order.
    pub fn staged_keys(&self) -> impl Iterator<Item = &str> {
        self.writes.iter().map(|(key, _)| key.as_str())
    }

    /// Apply the staged writes to the store.
    ///
    /// With `atomic` the writes go out as one `batch_put`. Otherwise they are
    /// replayed one at a time and a failure leaves the earlier ones applied.
    ///
    /// Returns the number of keys written.
    pub fn commit(self, atomic: bool) -> Result<usize, StoreError> {
        let count = self.writes.len();
        if count == 0 {
            return Ok(0);
        }

        debug!(writes = count, atomic, "Committing staged writes");
        if atomic {
            self.store.batch_put(self.writes)?;
        } else {
            for (key, value) in self.writes {
                self.store.put(&key, value)?;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedgerStore;

    #[test]
    fn test_reads_see_staged_writes() {
        let store = InMemoryLedgerStore::new();
        store.put("a", b"stored".to_vec()).unwrap();

        let mut staged = StagedWrites::new(&store);
        assert_eq!(staged.get("a").unwrap(), Some(b"stored".to_vec()));

        staged.put("a", b"staged".to_vec());
        assert_eq!(staged.get("a").unwrap(), Some(b"staged".to_vec()));
        // Store untouched until commit.
        assert_eq!(store.get("a").unwrap(), Some(b"stored".to_vec()));
    }

    #[test]
    fn test_restaging_keeps_first_position() {
        let store = InMemoryLedgerStore::new();
        let mut staged = StagedWrites::new(&store);
        staged.put("x", vec![1]);
        staged.put("y", vec![2]);
        staged.put("x", vec![3]);

        assert_eq!(staged.len(), 2);
        assert_eq!(staged.staged_keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(staged.get("x").unwrap(), Some(vec![3]));
    }

    #[test]
    fn test_commit_applies_all_writes() {
        let store = InMemoryLedgerStore::new();
        let mut staged = StagedWrites::new(&store);
        staged.put("x", vec![1]);
        staged.put("y", vec![2]);

        assert_eq!(staged.commit(true).unwrap(), 2);
        assert_eq!(store.get("x").unwrap(), Some(vec![1]));
        assert_eq!(store.get("y").unwrap(), Some(vec![2]));
    }

    #[test]
    fn test_sequential_commit_stops_at_failure() {
        let store = InMemoryLedgerStore::new();
        store.fail_writes_after(1);

        let mut staged = StagedWrites::new(&store);
        staged.put("x", vec![1]);
        staged.put("y", vec![2]);

        assert!(staged.commit(false).is_err());
        assert_eq!(store.get("x").unwrap(), Some(vec![1]));
        assert_eq!(store.get("y").unwrap(), None);
    }

    #[test]
    fn test_atomic_commit_is_all_or_nothing() {
        let store = InMemoryLedgerStore::new();
        store.fail_writes_after(1);

        let mut staged = StagedWrites::new(&store);
        staged.put("x", vec![1]);
        staged.put("y", vec![2]);

        assert!(staged.commit(true).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_commit_is_noop() {
        let store = InMemoryLedgerStore::new();
        store.fail_writes_after(0);
        let staged = StagedWrites::new(&store);
        assert_eq!(staged.commit(true).unwrap(), 0);
    }
}
