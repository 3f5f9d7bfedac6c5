//! # Integration Scenarios
//!
//! Requests go through `ufa_ledger::dispatch::Dispatcher` with string arguments, the way the
//! host platform submits them.

pub mod e2e_scenario;
pub mod flows;

#[cfg(test)]
pub(crate) mod harness;
