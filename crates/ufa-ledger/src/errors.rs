//! # Error Types
//!
//! All error types for agreement and invoice bookkeeping.

use crate::domain::invariants::ValidationReport;
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by the UFA ledger service.
#[derive(Debug, Error, Clone)]
pub enum LedgerError {
    /// One or more business rules rejected the request.
    ///
    /// Nothing was written to the store.
    #[error("validation failure: {}", .0.message())]
    Validation(ValidationReport),

    /// No agreement record is stored under this number.
    #[error("agreement not found: {agreement_number}")]
    AgreementNotFound { agreement_number: String },

    /// No invoice record is stored under this number.
    #[error("invoice not found: {invoice_number}")]
    InvoiceNotFound { invoice_number: String },

    /// No invoice is correlated with this external document number.
    #[error("no invoice linked to document: {document_number}")]
    DocumentNotFound { document_number: String },

    /// A stored or supplied payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the validation report if this is a business-rule rejection.
    #[must_use]
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }

    /// Returns true if the referenced record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AgreementNotFound { .. }
                | Self::InvoiceNotFound { .. }
                | Self::DocumentNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors raised by a [`LedgerStore`](crate::ports::outbound::LedgerStore) adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Persisted data could not be read back.
    #[error("corrupted entry at {key}: {message}")]
    Corrupted { key: String, message: String },

    /// The store refused or could not serve the request.
    #[error("store unavailable")]
    Unavailable,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariants::ValidationViolation;

    #[test]
    fn test_validation_error_display() {
        let report = ValidationReport::from_violations(vec![
            ValidationViolation::InvalidNetCharge,
            ValidationViolation::ToleranceOutOfRange { max: 10.0 },
        ]);
        let err = LedgerError::Validation(report);

        let text = err.to_string();
        assert!(text.starts_with("validation failure:"));
        assert!(text.contains("Invalid net charge"));
        assert!(text.contains("between 0 and 10"));
    }

    #[test]
    fn test_not_found_classification() {
        let err = LedgerError::AgreementNotFound {
            agreement_number: "UFA1".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "agreement not found: UFA1");

        let err = LedgerError::Serialization("bad".to_string());
        assert!(!err.is_not_found());
        assert!(err.validation_report().is_none());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: LedgerError = StoreError::Unavailable.into();
        assert!(matches!(err, LedgerError::Store(StoreError::Unavailable)));
    }
}
