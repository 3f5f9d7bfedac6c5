//! # File Ledger Store
//!
//! Keeps the whole key space in memory and rewrites a single JSON object
//! file on every commit. The file is replaced by rename, so a reader never
//! observes a half-written commit.

use crate::errors::StoreError;
use crate::ports::outbound::LedgerStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// [`LedgerStore`] persisted to `path` as `{"key": "value", ...}`.
///
/// Values must be UTF-8 text; every record, index and log the ledger
/// writes is JSON.
pub struct FileLedgerStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileLedgerStore {
    /// Open the store at `path`, loading existing content if the file exists.
    ///
    /// # Errors
    ///
    /// - `Io`: the file exists but cannot be read
    /// - `Corrupted`: the file is not a JSON object of strings
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path).map_err(io_error)?;
            serde_json::from_str(&text).map_err(|e| StoreError::Corrupted {
                key: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), entries = entries.len(), "Opened file ledger store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, text).map_err(io_error)?;
        fs::rename(&staging, &self.path).map_err(io_error)?;
        debug!(path = %self.path.display(), entries = entries.len(), "Persisted ledger file");
        Ok(())
    }
}

fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Io {
        message: err.to_string(),
    }
}

fn to_text(key: &str, value: Vec<u8>) -> Result<String, StoreError> {
    String::from_utf8(value).map_err(|_| StoreError::Io {
        message: format!("value for {key} is not UTF-8"),
    })
}

impl LedgerStore for FileLedgerStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .entries
            .read()
            .get(key)
            .map(|value| value.clone().into_bytes()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.batch_put(vec![(key.to_string(), value)])
    }

    fn batch_put(&self, writes: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        for (key, value) in writes {
            let text = to_text(&key, value)?;
            next.insert(key, text);
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
