//! PeerPool Performance Benchmarks
//!
//! Covers the hot paths of the ledger:
//! - Credit policy lookups (rate and limit tables)
//! - Score updates on repayment
//! - Full borrow/repay cycle through the engine

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use peerpool_common::types::loan::simple_interest;
use peerpool_common::{CreditScore, PaymentOutcome, SECONDS_PER_DAY};
use peerpool_ledger::{AccountId, InMemoryToken, LedgerEngine, ManualClock, OwnerGate};

// ============ POLICY BENCHMARKS ============

fn bench_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy");

    for score in [0u16, 300, 600, 800, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("rate_and_limit", score), score, |b, &s| {
            let score = CreditScore::new(s);
            b.iter(|| {
                black_box(score.interest_rate());
                black_box(score.max_loan_amount());
            });
        });
    }

    group.bench_function("simple_interest", |b| {
        b.iter(|| simple_interest(black_box(10_000), black_box(5), black_box(365)))
    });

    group.bench_function("after_repayment", |b| {
        let score = CreditScore::new(640);
        b.iter(|| {
            black_box(score).after_repayment(black_box(PaymentOutcome::OnTime), 400 * SECONDS_PER_DAY)
        })
    });

    group.finish();
}

// ============ ENGINE BENCHMARKS ============

fn bench_loan_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("borrow_repay", |b| {
        let custody = AccountId::from("pool");
        let owner = AccountId::from("owner");
        let alice = AccountId::from("alice");
        let token = Arc::new(InMemoryToken::new(custody.clone()));
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let engine = LedgerEngine::new(
            custody,
            token.clone(),
            clock,
            Arc::new(OwnerGate::new(owner.clone())),
        );
        token.mint(&owner, 1_000_000);
        token.approve(&owner, 1_000_000);
        engine.deposit(&owner, 1_000_000).unwrap();
        token.mint(&alice, u64::MAX as u128);
        token.approve(&alice, u64::MAX as u128);

        b.iter(|| {
            let id = engine.request_loan(&alice, 100, 30).unwrap();
            engine.repay_loan(&alice, id).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_policy, bench_loan_cycle);
criterion_main!(benches);
