//! # Dispatcher Flows
//!
//! Query surfaces and cross-record bookkeeping exercised through the
//! dispatcher:
//!
//! 1. **Agreement listing**: creation order, count, read idempotence
//! 2. **Invoice lookups**: per agreement, per actor, per external document
//! 3. **Updates**: merge-patch semantics for agreements and invoices
//! 4. **Validation queries**: envelope shape, no writes

#[cfg(test)]
mod tests {
    use crate::integration::harness::{agreement_json, pair_json, LedgerHarness};
    use serde_json::{json, Value};
    use ufa_ledger::prelude::*;

    fn numbers(list: &Value, field: &str) -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|record| record[field].as_str().unwrap_or_default().to_string())
            .collect()
    }

    // =========================================================================
    // AGREEMENT LISTING
    // =========================================================================

    #[test]
    fn test_query_all_in_creation_order() {
        let harness = LedgerHarness::new();
        let nets = ["300", "100", "200", "400"];
        for (i, net) in nets.iter().enumerate() {
            harness
                .call("createAgreement", &[&format!("UFA{i}"), "BUYER", &agreement_json(net, "2")])
                .unwrap();
        }

        let all = harness.call("queryAllAgreements", &[]).unwrap();
        assert_eq!(numbers(&all, "netCharge"), nets);
        assert_eq!(all, harness.call("queryAllAgreements", &[]).unwrap());
    }

    #[test]
    fn test_refused_agreements_are_not_listed() {
        let harness = LedgerHarness::new();
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("100", "1")])
            .unwrap();
        assert!(harness
            .call("createAgreement", &["UFA2", "SELLER", &agreement_json("-1", "1")])
            .is_err());
        assert!(harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("100", "1")])
            .is_err());

        let all = harness.call("queryAllAgreements", &[]).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 1);
        assert_eq!(
            harness.transcript(),
            vec![
                ("init".to_string(), true),
                ("createAgreement".to_string(), true),
                ("createAgreement".to_string(), false),
                ("createAgreement".to_string(), false),
                ("queryAllAgreements".to_string(), true),
            ]
        );
    }

    // =========================================================================
    // INVOICE LOOKUPS
    // =========================================================================

    #[test]
    fn test_invoice_lookups() {
        let harness = LedgerHarness::new();
        for ufa in ["UFA1", "UFA2"] {
            harness
                .call("createAgreement", &[ufa, "SELLER", &agreement_json("1000", "0")])
                .unwrap();
        }

        let mut pair: Value = serde_json::from_str(&pair_json("JAN", "UFA1", "100", "2024-01")).unwrap();
        pair[0]["raisedBy"] = json!("alice");
        pair[0]["sapDocumentNumber"] = json!("4900001");
        pair[1]["approverBy"] = json!("bob");
        harness
            .call("createInvoicePair", &["SELLER", &pair.to_string()])
            .unwrap();
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("OTHER", "UFA2", "100", "2024-01")])
            .unwrap();

        let for_ufa = harness.call("queryInvoicesForAgreement", &["UFA1"]).unwrap();
        assert_eq!(numbers(&for_ufa, "invoiceNumber"), ["JAN-C", "JAN-V"]);

        let alice = harness.call("queryInvoicesForActor", &["alice"]).unwrap();
        assert_eq!(numbers(&alice, "invoiceNumber"), ["JAN-C"]);
        let bob = harness.call("queryInvoicesForActor", &["bob"]).unwrap();
        assert_eq!(numbers(&bob, "invoiceNumber"), ["JAN-V"]);

        let by_doc = harness.call("queryInvoiceByDocument", &["4900001"]).unwrap();
        assert_eq!(by_doc["invoiceNumber"], "JAN-C");
        let links = harness.call("queryDocumentLinks", &["JAN-C"]).unwrap();
        assert_eq!(links, json!(["4900001"]));

        let err = harness.call("queryInvoiceByDocument", &["4900002"]).unwrap_err();
        assert_eq!(err.code(), -32004);
    }

    // =========================================================================
    // UPDATES
    // =========================================================================

    #[test]
    fn test_updates_merge_patch() {
        let harness = LedgerHarness::new();
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "5")])
            .unwrap();
        harness
            .call("createInvoicePair", &["SELLER", &pair_json("JAN", "UFA1", "100", "2024-01")])
            .unwrap();

        let updated = harness
            .call("updateInvoice", &["JAN-C", r#"{"status":"APPROVED","approverBy":"carol"}"#])
            .unwrap();
        assert_eq!(updated["status"], "APPROVED");
        assert_eq!(updated["invoiceAmt"], "100");
        assert_eq!(harness.call("queryInvoice", &["JAN-C"]).unwrap(), updated);

        let updated = harness
            .call("updateAgreement", &["UFA1", "BUYER", r#"{"note":"renegotiated"}"#])
            .unwrap();
        assert_eq!(updated["note"], "renegotiated");
        assert_eq!(updated["raisedInvTotal"], "100");

        let err = harness
            .call("updateInvoice", &["NOPE", r#"{"status":"APPROVED"}"#])
            .unwrap_err();
        assert_eq!(err.code(), -32004);
        assert_eq!(harness.stats().invoices_updated, 1);
    }

    // =========================================================================
    // VALIDATION QUERIES
    // =========================================================================

    #[test]
    fn test_validation_queries_do_not_write() {
        let harness = LedgerHarness::new();
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "5")])
            .unwrap();
        let before = harness.store.snapshot();

        let outcome = harness
            .call("validateInvoicePair", &["SELLER", &pair_json("JAN", "UFA1", "1000", "2024-01")])
            .unwrap();
        assert_eq!(outcome, json!({ "validation": "Success", "msg": "" }));

        let outcome = harness
            .call("validateAgreement", &["SELLER", &agreement_json("0", "20")])
            .unwrap();
        assert_eq!(outcome["validation"], "Failure");
        assert_eq!(
            outcome["msg"],
            "\nInvalid net charge\nTolerance is out of range. Should be between 0 and 10"
        );

        assert_eq!(harness.store.snapshot(), before);
    }

    #[test]
    fn test_configured_tolerance_limit() {
        let harness = LedgerHarness::with_config(ServiceConfig {
            max_tolerance_percent: 20.0,
            ..ServiceConfig::default()
        });
        harness
            .call("createAgreement", &["UFA1", "SELLER", &agreement_json("1000", "15")])
            .unwrap();

        let err = harness
            .call("createAgreement", &["UFA2", "SELLER", &agreement_json("1000", "25")])
            .unwrap_err();
        assert!(err.to_string().contains("between 0 and 20"));
    }
}
