//! # End-to-End Agreement Scenario
//!
//! One agreement with a 1000 net charge and 5% tolerance (ceiling 1050),
//! invoiced until the ceiling is reached.
//!
//! ## Flow Tested:
//!
//! 1. `createAgreement` UFA1 as SELLER
//! 2. `createInvoicePair` 1000 for 2024-01 (accepted, total 1000)
//! 3. Same billing period again (refused)
//! 4. 60 for 2024-02 (refused, 1060 > 1050)
//! 5. 50 for 2024-02 (accepted, total 1050)

#[cfg(test)]
mod tests {
    use crate::integration::harness::{agreement_json, pair_json, LedgerHarness};
    use ufa_ledger::prelude::*;

    fn raised_total(harness: &LedgerHarness) -> String {
        harness.call("queryAgreement", &["UFA1"]).unwrap()["raisedInvTotal"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_agreement_invoiced_up_to_ceiling() {
        let harness = LedgerHarness::new();

        // Step 1: agreement
        let created = harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "5")])
            .unwrap();
        assert_eq!(created["netCharge"], "1000");
        assert_eq!(raised_total(&harness), "");

        // Step 2: first pair
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("JAN", "UFA1", "1000", "2024-01")])
            .unwrap();
        assert_eq!(raised_total(&harness), "1000");

        // Step 3: same billing period
        let err = harness
            .call("createInvoicePair", &["SELLER", &pair_json("JAN2", "UFA1", "10", "2024-01")])
            .unwrap_err();
        assert!(err.to_string().contains("Invoices are already raised for 2024-01"));
        assert_eq!(raised_total(&harness), "1000");

        // Step 4: over the ceiling
        let err = harness
            .call("createInvoicePair", &["SELLER", &pair_json("FEB", "UFA1", "60", "2024-02")])
            .unwrap_err();
        assert!(err.to_string().contains("Total invoice amount exceeded: 1060 > 1050"));
        assert_eq!(err.code(), -32001);

        // Step 5: exactly to the ceiling
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("FEB", "UFA1", "50", "2024-02")])
            .unwrap();
        assert_eq!(raised_total(&harness), "1050");

        let stats = harness.stats();
        assert_eq!(stats.invoice_pairs_created, 2);
        assert_eq!(stats.validation_rejections, 2);
    }

    #[test]
    fn test_rejected_steps_leave_no_trace() {
        let harness = LedgerHarness::new();
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "5")])
            .unwrap();
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("JAN", "UFA1", "1000", "2024-01")])
            .unwrap();
        let before = harness.store.snapshot();

        for payload in [
            pair_json("X1", "UFA1", "10", "2024-01"),
            pair_json("X2", "UFA1", "60", "2024-02"),
            pair_json("X3", "UFA2", "10", "2024-02"),
        ] {
            assert!(harness.call("createInvoicePair", &["SELLER", &payload]).is_err());
        }

        assert_eq!(harness.store.snapshot(), before);
        let invoices = harness
            .call("queryInvoicesForAgreement", &["UFA1"])
            .unwrap();
        assert_eq!(invoices.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_history_records_every_applied_payload() {
        let harness = LedgerHarness::new();
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "5")])
            .unwrap();
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("JAN", "UFA1", "1000", "2024-01")])
            .unwrap();
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("FEB", "UFA1", "50", "2024-02")])
            .unwrap();

        let history = harness
            .call("queryTransactionHistory", &["UFA1"])
            .unwrap();
        let totals: Vec<&str> = history
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|entry| entry["raisedInvTotal"].as_str())
            .collect();
        assert_eq!(totals, vec!["1000", "1050"]);
        assert_eq!(history[0]["netCharge"], "1000");
    }

    #[test]
    fn test_observer_sees_committed_and_rejected_operations() {
        let harness = LedgerHarness::new();
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "5")])
            .unwrap();
        let _ = harness.call("createInvoicePair", &["SELLER", &pair_json("A", "UFA1", "2000", "P1")]);
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("B", "UFA1", "20", "P1")])
            .unwrap();

        assert_eq!(
            harness.observer.names(),
            vec!["agreement_created", "validation_rejected", "invoice_pair_created"]
        );
        match harness.observer.events().last() {
            Some(LedgerEvent::InvoicePairCreated { raised_total, .. }) => {
                assert_eq!(*raised_total, 20.0);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
