//! # UFA Ledger Service
//!
//! Application service implementing [`UfaLedgerApi`] over any [`LedgerStore`].
//!
//! - `agreements`: UFA manager (create, merge-patch update, queries, history)
//! - `invoices`: invoice manager (paired creation, updates, index queries)
//!
//! Every mutating operation stages its writes in a [`StagedWrites`] overlay
//! and commits once. Validation failures return before anything is staged
//! for commit.

mod agreements;
mod invoices;

use crate::adapters::{InMemoryLedgerStore, TracingObserver};
use crate::config::ServiceConfig;
use crate::domain::entities::{Agreement, Invoice, InvoicePair};
use crate::domain::invariants::ValidationReport;
use crate::domain::value_objects::RawRecord;
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::ports::inbound::UfaLedgerApi;
use crate::ports::outbound::{LedgerObserver, LedgerStore};
use crate::store::{index, StagedWrites};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Running counters kept by the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    pub agreements_created: u64,
    /// Explicit agreement updates (running-total rolls are not counted).
    pub agreements_updated: u64,
    pub invoice_pairs_created: u64,
    pub invoices_updated: u64,
    /// Create requests refused by the validation engine.
    pub validation_rejections: u64,
    /// Commits the store refused.
    pub failed_commits: u64,
}

/// The UFA ledger service.
pub struct UfaLedgerService<S: LedgerStore> {
    store: S,
    config: ServiceConfig,
    observer: Arc<dyn LedgerObserver>,
    stats: Mutex<ServiceStats>,
}

impl<S: LedgerStore> UfaLedgerService<S> {
    /// Create a service that reports events through `tracing`.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            observer: Arc::new(TracingObserver),
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    /// Replace the event observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn LedgerObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    fn emit(&self, event: LedgerEvent) {
        self.observer.on_event(&event);
    }

    /// Count and report a validation failure, returning it as an error.
    fn reject(&self, operation: &str, report: ValidationReport) -> LedgerError {
        self.stats.lock().validation_rejections += 1;
        self.emit(LedgerEvent::ValidationRejected {
            operation: operation.to_string(),
            message: report.message(),
        });
        LedgerError::Validation(report)
    }

    fn commit(&self, view: StagedWrites<'_, S>) -> Result<usize, LedgerError> {
        view.commit(self.config.atomic_writes).map_err(|e| {
            self.stats.lock().failed_commits += 1;
            error!(error = %e, atomic = self.config.atomic_writes, "Commit failed");
            LedgerError::from(e)
        })
    }
}

/// Accept a listed record that is missing or unreadable as its default value.
///
/// Store failures still propagate.
fn best_effort<T: Default>(result: Result<T, LedgerError>, key: &str) -> Result<T, LedgerError> {
    match result {
        Ok(record) => Ok(record),
        Err(e) if e.is_not_found() || matches!(e, LedgerError::Serialization(_)) => {
            warn!(key, error = %e, "Listed record unavailable, using empty record");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

impl<S: LedgerStore> UfaLedgerApi for UfaLedgerService<S> {
    #[instrument(skip(self))]
    fn initialize(&self) -> Result<(), LedgerError> {
        let mut view = StagedWrites::new(&self.store);
        let seeded_agreements = index::seed(&mut view, &self.config.keys.master_agreements)?;
        let seeded_invoices = index::seed(&mut view, &self.config.keys.master_invoices)?;
        self.commit(view)?;
        info!(seeded_agreements, seeded_invoices, "Ledger initialised");
        Ok(())
    }

    #[instrument(skip(self, payload), fields(agreement_number = %agreement_number))]
    fn create_agreement(
        &self,
        agreement_number: &str,
        actor_role: &str,
        payload: &RawRecord,
    ) -> Result<Agreement, LedgerError> {
        self.create_agreement_record(agreement_number, actor_role, payload)
    }

    #[instrument(skip(self, patch), fields(agreement_number = %agreement_number))]
    fn update_agreement(
        &self,
        agreement_number: &str,
        actor_role: &str,
        patch: &RawRecord,
    ) -> Result<Agreement, LedgerError> {
        self.update_agreement_record(agreement_number, patch)
    }

    #[instrument(skip(self))]
    fn query_agreement(&self, agreement_number: &str) -> Result<Agreement, LedgerError> {
        self.load_agreement(&StagedWrites::new(&self.store), agreement_number)
    }

    #[instrument(skip(self))]
    fn query_all_agreements(&self) -> Result<Vec<Agreement>, LedgerError> {
        self.list_agreements()
    }

    #[instrument(skip(self))]
    fn query_transaction_history(
        &self,
        agreement_number: &str,
    ) -> Result<Vec<RawRecord>, LedgerError> {
        self.agreement_history(agreement_number)
    }

    #[instrument(skip(self, payload))]
    fn validate_agreement(
        &self,
        actor_role: &str,
        payload: &RawRecord,
    ) -> Result<ValidationReport, LedgerError> {
        self.check_agreement_payload(actor_role, payload)
    }

    #[instrument(skip(self, payload), fields(entries = payload.len()))]
    fn create_invoice_pair(
        &self,
        actor_role: &str,
        payload: &[RawRecord],
    ) -> Result<InvoicePair, LedgerError> {
        self.create_invoice_pair_records(payload)
    }

    #[instrument(skip(self, patch), fields(invoice_number = %invoice_number))]
    fn update_invoice(
        &self,
        invoice_number: &str,
        patch: &RawRecord,
    ) -> Result<Invoice, LedgerError> {
        self.update_invoice_record(invoice_number, patch)
    }

    #[instrument(skip(self))]
    fn query_invoice(&self, invoice_number: &str) -> Result<Invoice, LedgerError> {
        self.load_invoice(&StagedWrites::new(&self.store), invoice_number)
    }

    #[instrument(skip(self))]
    fn query_invoices_for_agreement(
        &self,
        agreement_number: &str,
    ) -> Result<Vec<Invoice>, LedgerError> {
        self.list_agreement_invoices(agreement_number)
    }

    #[instrument(skip(self))]
    fn query_invoices_for_actor(&self, actor: &str) -> Result<Vec<Invoice>, LedgerError> {
        self.list_actor_invoices(actor)
    }

    #[instrument(skip(self))]
    fn query_invoice_by_document(&self, document_number: &str) -> Result<Invoice, LedgerError> {
        self.load_document_invoice(document_number)
    }

    #[instrument(skip(self))]
    fn query_document_links(&self, invoice_number: &str) -> Result<Vec<String>, LedgerError> {
        let view = StagedWrites::new(&self.store);
        index::read_list(&view, &self.config.keys.document_links(invoice_number))
    }

    #[instrument(skip(self, payload), fields(entries = payload.len()))]
    fn validate_invoice_pair(
        &self,
        actor_role: &str,
        payload: &[RawRecord],
    ) -> Result<ValidationReport, LedgerError> {
        self.check_invoice_pair_payload(payload)
    }
}

/// Service over a fresh in-memory store with default configuration.
pub fn create_test_service() -> UfaLedgerService<InMemoryLedgerStore> {
    UfaLedgerService::new(InMemoryLedgerStore::new(), ServiceConfig::default())
}
