//! Shared fixtures for the integration scenarios.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use ufa_ledger::prelude::*;

/// Dispatcher over a fresh in-memory ledger, with a transcript of every call.
pub struct LedgerHarness {
    pub dispatcher: Dispatcher<UfaLedgerService<Arc<InMemoryLedgerStore>>>,
    pub store: Arc<InMemoryLedgerStore>,
    pub observer: Arc<RecordingObserver>,
    transcript: Mutex<Vec<(String, bool)>>,
}

impl LedgerHarness {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let store = Arc::new(InMemoryLedgerStore::new());
        let observer = Arc::new(RecordingObserver::new());
        let service = UfaLedgerService::new(Arc::clone(&store), config)
            .with_observer(observer.clone());
        let harness = Self {
            dispatcher: Dispatcher::new(service),
            store,
            observer,
            transcript: Mutex::new(Vec::new()),
        };
        harness
            .call("init", &[])
            .expect("init on an empty store succeeds");
        harness
    }

    /// Run an operation with string arguments.
    pub fn call(&self, op: &str, args: &[&str]) -> Result<Value, DispatchError> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        let result = self.dispatcher.execute(op, &args);
        self.transcript.lock().push((op.to_string(), result.is_ok()));
        result
    }

    /// Operations called so far with their success flag.
    pub fn transcript(&self) -> Vec<(String, bool)> {
        self.transcript.lock().clone()
    }

    pub fn stats(&self) -> ServiceStats {
        self.dispatcher.api().stats()
    }
}

impl Default for LedgerHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON text of an agreement payload.
pub fn agreement_json(net_charge: &str, tolerance: &str) -> String {
    serde_json::json!({ "netCharge": net_charge, "chargeTolerance": tolerance }).to_string()
}

/// JSON text of a customer/vendor pair payload.
pub fn pair_json(tag: &str, ufa: &str, amount: &str, period: &str) -> String {
    let side = |suffix: &str| {
        serde_json::json!({
            "invoiceNumber": format!("{tag}-{suffix}"),
            "ufaNumber": ufa,
            "invoiceAmt": amount,
            "billingPeriod": period,
            "status": "RAISED",
        })
    };
    Value::Array(vec![side("C"), side("V")]).to_string()
}
