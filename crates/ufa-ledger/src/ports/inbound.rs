//! # Driving Ports (API - Inbound)
//!
//! The operation surface exposed to the dispatcher and to embedding code.

use crate::domain::entities::{Agreement, Invoice, InvoicePair};
use crate::domain::invariants::ValidationReport;
use crate::domain::value_objects::RawRecord;
use crate::errors::LedgerError;

/// Primary API of the UFA ledger.
///
/// Mutating operations either commit every write they stage or none of
/// them (see [`ServiceConfig::atomic_writes`](crate::config::ServiceConfig)).
pub trait UfaLedgerApi {
    /// Seed the empty master indices. Existing indices are left as they are.
    fn initialize(&self) -> Result<(), LedgerError>;

    // === Agreements ===

    /// Validate and store a new agreement, index it and open its history.
    ///
    /// # Errors
    ///
    /// - `Validation`: a business rule rejected the payload (nothing written)
    fn create_agreement(
        &self,
        agreement_number: &str,
        actor_role: &str,
        payload: &RawRecord,
    ) -> Result<Agreement, LedgerError>;

    /// Merge `patch` into the stored agreement and append it to the history.
    ///
    /// # Errors
    ///
    /// - `AgreementNotFound`: nothing stored under `agreement_number`
    fn update_agreement(
        &self,
        agreement_number: &str,
        actor_role: &str,
        patch: &RawRecord,
    ) -> Result<Agreement, LedgerError>;

    fn query_agreement(&self, agreement_number: &str) -> Result<Agreement, LedgerError>;

    /// All agreements in creation order. Unreadable entries come back empty.
    fn query_all_agreements(&self) -> Result<Vec<Agreement>, LedgerError>;

    /// Every payload ever applied to the agreement, oldest first.
    fn query_transaction_history(
        &self,
        agreement_number: &str,
    ) -> Result<Vec<RawRecord>, LedgerError>;

    /// Run the agreement rules without writing anything.
    fn validate_agreement(
        &self,
        actor_role: &str,
        payload: &RawRecord,
    ) -> Result<ValidationReport, LedgerError>;

    // === Invoices ===

    /// Validate and store a customer/vendor invoice pair and roll the
    /// agreement's running total forward.
    ///
    /// # Errors
    ///
    /// - `Validation`: a business rule rejected the pair (nothing written)
    fn create_invoice_pair(
        &self,
        actor_role: &str,
        payload: &[RawRecord],
    ) -> Result<InvoicePair, LedgerError>;

    /// Merge `patch` into the stored invoice. Any status value is accepted.
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound`: nothing stored under `invoice_number`
    fn update_invoice(&self, invoice_number: &str, patch: &RawRecord)
        -> Result<Invoice, LedgerError>;

    fn query_invoice(&self, invoice_number: &str) -> Result<Invoice, LedgerError>;

    /// Invoices of one agreement as `[customer, vendor]` pairs in creation order.
    fn query_invoices_for_agreement(
        &self,
        agreement_number: &str,
    ) -> Result<Vec<Invoice>, LedgerError>;

    /// Invoices raised or approved by `actor`.
    fn query_invoices_for_actor(&self, actor: &str) -> Result<Vec<Invoice>, LedgerError>;

    /// Customer invoice stored under an external document number.
    fn query_invoice_by_document(&self, document_number: &str) -> Result<Invoice, LedgerError>;

    /// External document numbers ever linked to an invoice.
    fn query_document_links(&self, invoice_number: &str) -> Result<Vec<String>, LedgerError>;

    /// Run the invoice-pair rules without writing anything.
    fn validate_invoice_pair(
        &self,
        actor_role: &str,
        payload: &[RawRecord],
    ) -> Result<ValidationReport, LedgerError>;
}
