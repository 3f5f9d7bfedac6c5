//! # UFA Ledger - Upfront Agreements and Paired Invoices
//!
//! Bookkeeping for Upfront Agreements (UFA), charge ceilings negotiated
//! between a buyer and a seller, and the customer/vendor invoice pairs raised
//! against them. Everything is stored through a key-value [`LedgerStore`]
//! supplied by the host; replication and commit ordering live behind it.
//!
//! ## Business Rules
//!
//! | Rule | Enforcement Location |
//! |------|---------------------|
//! | Role is `SELLER` or `BUYER` on agreement creation | `domain/invariants.rs` - `validate_new_agreement()` |
//! | `netCharge > 0`, `0 <= chargeTolerance <= 10` | `domain/invariants.rs` - `validate_new_agreement()` |
//! | Invoices come in customer/vendor pairs with equal amounts | `domain/invariants.rs` - `validate_invoice_pair()` |
//! | One invoice pair per agreement and billing period | `domain/invariants.rs` - `validate_invoice_pair()` |
//! | `raisedInvTotal <= netCharge * (1 + tolerance / 100)` | `domain/invariants.rs` - `validate_invoice_pair()` |
//! | An external document number binds to one invoice | `domain/invariants.rs` - `validate_invoice_pair()` |
//! | No writes on rejection; one commit per operation | `service/` + `store/batch.rs` |
//!
//! ## Store Layout
//!
//! | Key | Content |
//! |-----|---------|
//! | `<agreement number>` | Agreement record |
//! | `<invoice number>` | Invoice record |
//! | `ALL_RECS` | Agreement numbers in creation order |
//! | `ALL_INVOICES` | Invoice numbers in creation order |
//! | `UFA_INVOICE_PREFIX_<agreement>` | `[customer, vendor, ...]` invoice numbers |
//! | `UFA_TRXN_HISTORY_<agreement>` | Every payload applied to the agreement |
//! | `INVOICE_DOC_LINK_<invoice>` | External document numbers linked to the invoice |
//! | `SAP_DOC_<document>` | Customer invoice copy keyed by document number |
//!
//! ## Usage Example
//!
//! ```
//! use ufa_ledger::prelude::*;
//!
//! let service = create_test_service();
//! let mut payload = RawRecord::new();
//! payload.insert("netCharge".into(), "1000".into());
//! payload.insert("chargeTolerance".into(), "5".into());
//!
//! let agreement = service.create_agreement("UFA1", "SELLER", &payload).unwrap();
//! assert_eq!(agreement.max_charge(), 1050.0);
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;
pub mod store;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{Agreement, FlatRecord, Invoice, InvoicePair};
    pub use crate::domain::invariants::{
        validate_invoice_pair, validate_new_agreement, InvoicePairContext, ValidationOutcome,
        ValidationReport, ValidationViolation,
    };
    pub use crate::domain::value_objects::{ActorRole, DecimalText, RawRecord, SENTINEL_AMOUNT};

    // Ports
    pub use crate::ports::inbound::UfaLedgerApi;
    pub use crate::ports::outbound::{LedgerObserver, LedgerStore};

    // Adapters
    pub use crate::adapters::{
        FileLedgerStore, InMemoryLedgerStore, RecordingObserver, TracingObserver,
    };

    // Service
    pub use crate::config::{KeyLayout, ServiceConfig};
    pub use crate::dispatch::{Command, DispatchError, Dispatcher, Operation};
    pub use crate::events::LedgerEvent;
    pub use crate::service::{create_test_service, ServiceStats, UfaLedgerService};

    // Errors
    pub use crate::errors::{LedgerError, StoreError};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use ports::outbound::LedgerStore;
