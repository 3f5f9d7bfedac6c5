//! Invoice manager: paired invoice creation, invoice updates and the
//! invoice indices.

use super::{best_effort, UfaLedgerService};
use crate::domain::entities::{Agreement, FlatRecord, Invoice, InvoicePair};
use crate::domain::invariants::{validate_invoice_pair, InvoicePairContext, ValidationReport};
use crate::domain::value_objects::RawRecord;
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::ports::outbound::LedgerStore;
use crate::store::{index, StagedWrites};
use tracing::{debug, warn};

impl<S: LedgerStore> UfaLedgerService<S> {
    /// Read the invoice stored under `invoice_number`.
    pub(super) fn load_invoice(
        &self,
        view: &StagedWrites<'_, S>,
        invoice_number: &str,
    ) -> Result<Invoice, LedgerError> {
        let not_found = || LedgerError::InvoiceNotFound {
            invoice_number: invoice_number.to_string(),
        };
        if invoice_number.is_empty() || self.config.keys.is_reserved(invoice_number) {
            return Err(not_found());
        }

        match view.get(invoice_number)? {
            Some(bytes) => decode_invoice(invoice_number, &bytes),
            None => Err(not_found()),
        }
    }

    /// Gather the stored state the pair rules look at.
    fn invoice_pair_context(
        &self,
        view: &StagedWrites<'_, S>,
        pair: &InvoicePair,
    ) -> Result<InvoicePairContext, LedgerError> {
        let keys = &self.config.keys;
        let agreement_number = pair.agreement_number();

        let agreement = match self.load_agreement(view, agreement_number) {
            Ok(agreement) => Some(agreement),
            Err(e) if e.is_not_found() => None,
            Err(LedgerError::Serialization(reason)) => {
                warn!(agreement_number, %reason, "Referenced agreement is unreadable");
                None
            }
            Err(e) => return Err(e),
        };

        let mut invoiced_periods = Vec::new();
        if agreement.is_some() {
            for number in index::read_list(view, &keys.agreement_invoices(agreement_number))? {
                let invoice = best_effort(self.load_invoice(view, &number), &number)?;
                invoiced_periods.push(invoice.billing_period().to_string());
            }
        }

        let mut existing_invoice_numbers = Vec::new();
        let mut reserved_invoice_numbers = Vec::new();
        let customer = pair.customer.invoice_number();
        let vendor = pair.vendor.invoice_number();
        let mut numbers = vec![customer];
        if vendor != customer {
            numbers.push(vendor);
        }
        for number in numbers {
            if number.is_empty() {
                continue;
            }
            if keys.is_reserved(number) {
                reserved_invoice_numbers.push(number.to_string());
            } else if self.config.enforce_unique_records && view.contains(number)? {
                existing_invoice_numbers.push(number.to_string());
            }
        }

        let document = pair.customer.sap_document_number();
        let linked_document = if self.config.enforce_unique_records
            && !document.is_empty()
            && view.contains(&keys.document_record(document))?
        {
            Some(document.to_string())
        } else {
            None
        };

        Ok(InvoicePairContext {
            agreement,
            invoiced_periods,
            existing_invoice_numbers,
            reserved_invoice_numbers,
            linked_document,
        })
    }

    /// Decode the payload and run the pair rules against the current store.
    fn check_invoice_pair(
        &self,
        view: &StagedWrites<'_, S>,
        payload: &[RawRecord],
    ) -> Result<(Option<InvoicePair>, InvoicePairContext, ValidationReport), LedgerError> {
        let pair = InvoicePair::from_entries(payload)?;
        let ctx = match &pair {
            Some(pair) => self.invoice_pair_context(view, pair)?,
            None => InvoicePairContext::default(),
        };
        let report = validate_invoice_pair(pair.as_ref(), &ctx);
        Ok((pair, ctx, report))
    }

    pub(super) fn check_invoice_pair_payload(
        &self,
        payload: &[RawRecord],
    ) -> Result<ValidationReport, LedgerError> {
        let view = StagedWrites::new(&self.store);
        let (_, _, report) = self.check_invoice_pair(&view, payload)?;
        Ok(report)
    }

    pub(super) fn create_invoice_pair_records(
        &self,
        payload: &[RawRecord],
    ) -> Result<InvoicePair, LedgerError> {
        let mut view = StagedWrites::new(&self.store);
        let (pair, ctx, report) = self.check_invoice_pair(&view, payload)?;

        let (Some(pair), Some(agreement), true) = (pair, ctx.agreement, report.is_valid()) else {
            return Err(self.reject("createInvoicePair", report));
        };

        let keys = &self.config.keys;
        let agreement_number = pair.agreement_number();
        let customer = pair.customer.invoice_number();
        let vendor = pair.vendor.invoice_number();
        let document = pair.customer.sap_document_number();

        view.put(customer, pair.customer.encode()?);
        view.put(vendor, pair.vendor.encode()?);
        if !document.is_empty() {
            view.put(&keys.document_record(document), pair.customer.encode()?);
        }

        index::append(
            &mut view,
            &keys.agreement_invoices(agreement_number),
            &[customer, vendor],
        )?;
        if !document.is_empty() {
            index::append(&mut view, &keys.document_links(customer), &[document])?;
        }
        index::append(&mut view, &keys.master_invoices, &[customer, vendor])?;

        let raised_total = agreement.raised_total() + pair.customer.amount();
        self.stage_agreement_patch(
            &mut view,
            agreement_number,
            &Agreement::raised_total_patch(raised_total),
        )?;

        let writes = self.commit(view)?;
        debug!(writes, raised_total, "Invoice pair committed");

        self.stats.lock().invoice_pairs_created += 1;
        self.emit(LedgerEvent::InvoicePairCreated {
            agreement_number: agreement_number.to_string(),
            customer_invoice: customer.to_string(),
            vendor_invoice: vendor.to_string(),
            raised_total,
        });
        Ok(pair)
    }

    pub(super) fn update_invoice_record(
        &self,
        invoice_number: &str,
        patch: &RawRecord,
    ) -> Result<Invoice, LedgerError> {
        let mut view = StagedWrites::new(&self.store);
        let updated = self.load_invoice(&view, invoice_number)?.merged(patch)?;
        view.put(invoice_number, updated.encode()?);
        self.commit(view)?;

        self.stats.lock().invoices_updated += 1;
        self.emit(LedgerEvent::InvoiceUpdated {
            invoice_number: invoice_number.to_string(),
            fields: patch.keys().cloned().collect(),
        });
        Ok(updated)
    }

    fn load_listed_invoices(
        &self,
        view: &StagedWrites<'_, S>,
        index_key: &str,
    ) -> Result<Vec<Invoice>, LedgerError> {
        index::read_list(view, index_key)?
            .iter()
            .map(|number| best_effort(self.load_invoice(view, number), number))
            .collect()
    }

    pub(super) fn list_agreement_invoices(
        &self,
        agreement_number: &str,
    ) -> Result<Vec<Invoice>, LedgerError> {
        let view = StagedWrites::new(&self.store);
        self.load_listed_invoices(&view, &self.config.keys.agreement_invoices(agreement_number))
    }

    pub(super) fn list_actor_invoices(&self, actor: &str) -> Result<Vec<Invoice>, LedgerError> {
        let view = StagedWrites::new(&self.store);
        let invoices = self.load_listed_invoices(&view, &self.config.keys.master_invoices)?;
        Ok(invoices
            .into_iter()
            .filter(|invoice| invoice.involves(actor))
            .collect())
    }

    pub(super) fn load_document_invoice(
        &self,
        document_number: &str,
    ) -> Result<Invoice, LedgerError> {
        let key = self.config.keys.document_record(document_number);
        match self.store.get(&key)? {
            Some(bytes) if !document_number.is_empty() => decode_invoice(&key, &bytes),
            _ => Err(LedgerError::DocumentNotFound {
                document_number: document_number.to_string(),
            }),
        }
    }
}

fn decode_invoice(key: &str, bytes: &[u8]) -> Result<Invoice, LedgerError> {
    serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::Serialization(format!("invoice {key}: {e}")))
}
