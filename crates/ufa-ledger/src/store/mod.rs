//! # Store Plumbing
//!
//! Helpers layered over a [`LedgerStore`](crate::ports::outbound::LedgerStore):
//!
//! - [`batch`]: staged write overlay committed once per operation
//! - [`index`]: append-only ordered lists of record numbers
//! - [`history`]: per-agreement audit log of applied payloads

pub mod batch;
pub mod history;
pub mod index;

pub use batch::StagedWrites;
