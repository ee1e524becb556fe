//! Benchmarks for the folio-metrics calculators.
//!
//! Run with: cargo bench -p folio-metrics

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use folio_metrics::cashflow::{build_cash_flows, DatedCashFlow};
use folio_metrics::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// Monthly SIPs with an occasional withdrawal, spread over accounts.
fn create_ledger(size: usize, accounts: usize) -> Vec<Transaction> {
    let start = Date::from_ymd(2015, 1, 10).unwrap();
    let current_nav = dec!(87.40);

    (0..size)
        .map(|i| {
            let date = start.add_days((i as i64 * 30) % 3_600).unwrap();
            let nav = Decimal::from(40 + (i % 45) as i64);
            let (kind, amount) = if i % 11 == 10 {
                (TransactionKind::Swp, dec!(1500))
            } else {
                (TransactionKind::Sip, dec!(5000))
            };
            let units = (amount / nav).round_dp(3);
            let units = if kind.is_disposal() { -units } else { units };

            Transaction::new(date, kind, amount, units, current_nav)
                .unwrap()
                .with_account(format!("CAN-{:04}", i % accounts.max(1)))
        })
        .collect()
}

fn as_of() -> Date {
    Date::from_ymd(2025, 1, 10).unwrap()
}

// =============================================================================
// XIRR BENCHMARKS
// =============================================================================

fn bench_xirr_two_flows(c: &mut Criterion) {
    let start = Date::from_ymd(2023, 1, 1).unwrap();
    let flows = [
        DatedCashFlow::new(start, -10_000.0),
        DatedCashFlow::new(start.add_days(365).unwrap(), 11_500.0),
    ];
    let config = XirrConfig::default();

    c.bench_function("xirr_two_flows", |b| {
        b.iter(|| xirr(black_box(&flows), &config))
    });
}

fn bench_xirr_series(c: &mut Criterion) {
    let config = XirrConfig::default();
    let mut group = c.benchmark_group("xirr_series");

    for size in [12, 60, 120, 600].iter() {
        let ledger = create_ledger(*size, 1);
        let value = calculate_current_value(&ledger).unwrap();
        let series = build_cash_flows(&ledger, value, as_of()).unwrap();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), series.flows(), |b, flows| {
            b.iter(|| xirr(black_box(flows), &config))
        });
    }
    group.finish();
}

// =============================================================================
// CALCULATOR BENCHMARKS
// =============================================================================

fn bench_calculate_metrics(c: &mut Criterion) {
    let config = MetricsConfig::default();
    let mut group = c.benchmark_group("calculate_metrics");

    for size in [10, 100, 1000].iter() {
        let ledger = create_ledger(*size, 1);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ledger, |b, ledger| {
            b.iter(|| calculate_metrics_as_of(black_box(ledger), as_of(), &config))
        });
    }
    group.finish();
}

fn bench_by_account(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics_by_account");
    group.sample_size(30);

    let ledger = create_ledger(20_000, 500);
    group.throughput(Throughput::Elements(500));

    group.bench_function("sequential", |b| {
        b.iter(|| metrics_by_account(black_box(&ledger), as_of(), &MetricsConfig::sequential()))
    });
    group.bench_function("default", |b| {
        b.iter(|| metrics_by_account(black_box(&ledger), as_of(), &MetricsConfig::default()))
    });
    group.finish();
}

criterion_group!(xirr_benches, bench_xirr_two_flows, bench_xirr_series);

criterion_group!(calculator_benches, bench_calculate_metrics, bench_by_account);

criterion_main!(xirr_benches, calculator_benches);
