use crate::events::LedgerEvent;
use crate::ports::outbound::LedgerObserver;
use parking_lot::Mutex;
use tracing::{info, warn};

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LedgerObserver for TracingObserver {
    fn on_event(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::AgreementCreated { agreement_number } => {
                info!(agreement_number = %agreement_number, "{}", event.name());
            }
            LedgerEvent::AgreementUpdated {
                agreement_number,
                fields,
            } => {
                info!(agreement_number = %agreement_number, ?fields, "{}", event.name());
            }
            LedgerEvent::InvoicePairCreated {
                agreement_number,
                customer_invoice,
                vendor_invoice,
                raised_total,
            } => {
                info!(
                    agreement_number = %agreement_number,
                    customer_invoice = %customer_invoice,
                    vendor_invoice = %vendor_invoice,
                    raised_total,
                    "{}",
                    event.name()
                );
            }
            LedgerEvent::InvoiceUpdated {
                invoice_number,
                fields,
            } => {
                info!(invoice_number = %invoice_number, ?fields, "{}", event.name());
            }
            LedgerEvent::ValidationRejected { operation, message } => {
                warn!(operation = %operation, reasons = %message.trim_start(), "{}", event.name());
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Event names in arrival order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(LedgerEvent::name).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl LedgerObserver for RecordingObserver {
    fn on_event(&self, event: &LedgerEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.on_event(&LedgerEvent::AgreementCreated {
            agreement_number: "UFA1".to_string(),
        });
        observer.on_event(&LedgerEvent::ValidationRejected {
            operation: "createInvoicePair".to_string(),
            message: "\nInvalid UFA provided: UFA2".to_string(),
        });

        assert_eq!(observer.names(), vec!["agreement_created", "validation_rejected"]);
        observer.clear();
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_tracing_observer_accepts_every_event() {
        let observer = TracingObserver;
        observer.on_event(&LedgerEvent::InvoicePairCreated {
            agreement_number: "UFA1".to_string(),
            customer_invoice: "C1".to_string(),
            vendor_invoice: "V1".to_string(),
            raised_total: 1000.0,
        });
    }
}
