//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Ports (Inbound)**: `UfaLedgerApi`
//! - **Driven Ports (Outbound)**: `LedgerStore`, `LedgerObserver`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
