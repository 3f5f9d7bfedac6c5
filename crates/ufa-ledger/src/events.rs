//! # Ledger Events
//!
//! Notifications emitted to the [`LedgerObserver`](crate::ports::outbound::LedgerObserver)
//! after each operation. Events describe what was committed (or rejected);
//! they never carry full record payloads.

use serde::{Deserialize, Serialize};

/// Something the ledger service did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new agreement and its first history entry were committed.
    AgreementCreated { agreement_number: String },
    /// A patch was merged into an agreement.
    AgreementUpdated {
        agreement_number: String,
        /// Keys carried by the patch.
        fields: Vec<String>,
    },
    /// Both invoices of a pair and all their index entries were committed.
    InvoicePairCreated {
        agreement_number: String,
        customer_invoice: String,
        vendor_invoice: String,
        /// Running total after this pair.
        raised_total: f64,
    },
    /// A patch was merged into an invoice.
    InvoiceUpdated {
        invoice_number: String,
        fields: Vec<String>,
    },
    /// A create operation was refused by the validation engine.
    ValidationRejected {
        operation: String,
        message: String,
    },
}

impl LedgerEvent {
    /// Short name used as the log message for this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AgreementCreated { .. } => "agreement_created",
            Self::AgreementUpdated { .. } => "agreement_updated",
            Self::InvoicePairCreated { .. } => "invoice_pair_created",
            Self::InvoiceUpdated { .. } => "invoice_updated",
            Self::ValidationRejected { .. } => "validation_rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = LedgerEvent::AgreementCreated {
            agreement_number: "UFA1".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "agreement_created");
        assert_eq!(json["agreement_number"], "UFA1");
        assert_eq!(event.name(), "agreement_created");
    }
}
