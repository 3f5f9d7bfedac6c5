//! # UFA Ledger Benchmarks
//!
//! | Path | Cost driver |
//! |------|-------------|
//! | createAgreement | master index rewrite, history seed |
//! | createInvoicePair | agreement index scan for the billing period, five index writes |
//! | queryAllAgreements | one store read per listed agreement |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use ufa_ledger::prelude::*;

fn agreement_payload(net_charge: &str) -> RawRecord {
    let mut payload = RawRecord::new();
    payload.insert("netCharge".to_string(), net_charge.to_string());
    payload.insert("chargeTolerance".to_string(), "5".to_string());
    payload
}

fn pair_payload(tag: &str, ufa: &str, period: &str) -> Vec<RawRecord> {
    ["C", "V"]
        .iter()
        .map(|side| {
            let mut invoice = RawRecord::new();
            invoice.insert("invoiceNumber".to_string(), format!("{tag}-{side}"));
            invoice.insert("ufaNumber".to_string(), ufa.to_string());
            invoice.insert("invoiceAmt".to_string(), "1".to_string());
            invoice.insert("billingPeriod".to_string(), period.to_string());
            invoice.insert("status".to_string(), "RAISED".to_string());
            invoice
        })
        .collect()
}

fn fresh_service(config: ServiceConfig) -> UfaLedgerService<Arc<InMemoryLedgerStore>> {
    let service = UfaLedgerService::new(Arc::new(InMemoryLedgerStore::new()), config);
    service.initialize().expect("init on an empty store");
    service
}

// ============================================================================
// Agreements
// ============================================================================

fn bench_create_agreement(c: &mut Criterion) {
    let mut group = c.benchmark_group("create-agreement");

    for (label, config) in [
        ("atomic", ServiceConfig::default()),
        ("sequential", ServiceConfig::permissive()),
    ] {
        group.bench_function(label, |b| {
            let service = fresh_service(config.clone());
            let payload = agreement_payload("1000");
            let mut n = 0u64;
            b.iter(|| {
                n += 1;
                black_box(service.create_agreement(&format!("UFA{n}"), "SELLER", &payload))
            })
        });
    }

    group.finish();
}

fn bench_query_all_agreements(c: &mut Criterion) {
    let mut group = c.benchmark_group("query-all-agreements");

    for size in [10usize, 100, 1000] {
        let service = fresh_service(ServiceConfig::default());
        let payload = agreement_payload("1000");
        for i in 0..size {
            service
                .create_agreement(&format!("UFA{i}"), "BUYER", &payload)
                .expect("seed agreement");
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &service, |b, service| {
            b.iter(|| black_box(service.query_all_agreements()))
        });
    }

    group.finish();
}

// ============================================================================
// Invoice pairs
// ============================================================================

fn bench_create_invoice_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("create-invoice-pair");

    // Each pair scans the invoices already raised against its agreement.
    for existing in [0usize, 50, 200] {
        group.bench_with_input(BenchmarkId::new("existing_pairs", existing), &existing, |b, &existing| {
            let service = fresh_service(ServiceConfig::default());
            service
                .create_agreement("UFA1", "SELLER", &agreement_payload("1000000000"))
                .expect("seed agreement");
            for i in 0..existing {
                service
                    .create_invoice_pair("SELLER", &pair_payload(&format!("S{i}"), "UFA1", &format!("P{i}")))
                    .expect("seed pair");
            }
            let mut n = 0u64;
            b.iter(|| {
                n += 1;
                let tag = format!("B{n}");
                black_box(service.create_invoice_pair("SELLER", &pair_payload(&tag, "UFA1", &tag)))
            })
        });
    }

    group.finish();
}

fn bench_validate_invoice_pair(c: &mut Criterion) {
    let service = fresh_service(ServiceConfig::default());
    service
        .create_agreement("UFA1", "SELLER", &agreement_payload("1000"))
        .expect("seed agreement");
    let payload = pair_payload("V", "UFA1", "2024-01");

    c.bench_function("validate-invoice-pair", |b| {
        b.iter(|| black_box(service.validate_invoice_pair("SELLER", &payload)))
    });
}

criterion_group!(
    benches,
    bench_create_agreement,
    bench_query_all_agreements,
    bench_create_invoice_pair,
    bench_validate_invoice_pair,
);
criterion_main!(benches);
