//! # Adapters
//!
//! Implementations of the outbound ports.
//!
//! - `InMemoryLedgerStore`: map-backed store for tests and scripted runs
//! - `FileLedgerStore`: store persisted to a single JSON file
//! - `TracingObserver` / `RecordingObserver`: event sinks

pub mod file_store;
pub mod memory_store;
pub mod observer;

pub use file_store::FileLedgerStore;
pub use memory_store::InMemoryLedgerStore;
pub use observer::{RecordingObserver, TracingObserver};
