use ufa_ledger::events::LedgerEvent;
use ufa_ledger::ports::outbound::LedgerObserver;
use ufa_telemetry::{log_agreement_event, log_invoice_event};

/// Writes ledger events to the node log with the standard record fields.
pub struct NodeObserver;

impl LedgerObserver for NodeObserver {
    fn on_event(&self, event: &LedgerEvent) {
        let name = event.name();
        match event {
            LedgerEvent::AgreementCreated { agreement_number } => {
                log_agreement_event!(info, name, agreement_number);
            }
            LedgerEvent::AgreementUpdated {
                agreement_number,
                fields,
            } => {
                log_agreement_event!(info, name, agreement_number, fields = ?fields);
            }
            LedgerEvent::InvoicePairCreated {
                agreement_number,
                customer_invoice,
                vendor_invoice,
                raised_total,
            } => {
                log_invoice_event!(
                    info,
                    name,
                    customer_invoice,
                    agreement_number = %agreement_number,
                    vendor_invoice = %vendor_invoice,
                    raised_total = *raised_total
                );
            }
            LedgerEvent::InvoiceUpdated {
                invoice_number,
                fields,
            } => {
                log_invoice_event!(info, name, invoice_number, fields = ?fields);
            }
            LedgerEvent::ValidationRejected { operation, message } => {
                tracing::warn!(operation = %operation, reasons = %message.trim_start(), "{name}");
            }
        }
    }
}
