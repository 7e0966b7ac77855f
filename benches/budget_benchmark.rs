use budget_engine::dashboard::{BudgetView, InputEvent, MoneyFlow};
use budget_engine::core::snapshot::SavingsGoal;
use budget_engine::engine::aggregate::aggregate_by;
use budget_engine::engine::breakdown::ExpenseBreakdown;
use budget_engine::engine::projection::{compound_interest, loan_monthly_payment};
use budget_engine::import::spending::{read_spending, write_spending, ImportOptions};
use budget_engine::simulation::{generate_snapshot, generate_spending, SpendingConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

fn bench_totals_1000_categories(c: &mut Criterion) {
    let snapshot = generate_snapshot(1000, Some(1)).expect("generated snapshot");

    c.bench_function("totals_1000_categories", |b| b.iter(|| black_box(&snapshot).totals()));
    c.bench_function("breakdown_1000_categories", |b| {
        b.iter(|| ExpenseBreakdown::from_snapshot(black_box(&snapshot)))
    });
    c.bench_function("money_flow_1000_categories", |b| {
        b.iter(|| MoneyFlow::from_snapshot(black_box(&snapshot)))
    });
}

fn bench_view_events(c: &mut Criterion) {
    let snapshot = generate_snapshot(50, Some(2)).expect("generated snapshot");
    let mut view = BudgetView::new(snapshot, SavingsGoal::new(dec!(5000)).expect("goal"));
    let mut target = 0u32;

    c.bench_function("view_goal_change_50_categories", |b| {
        b.iter(|| {
            target = (target + 1) % 10_000;
            view.apply(InputEvent::GoalChanged { target: target.into() })
        })
    });
}

fn bench_aggregate_10k_rows(c: &mut Criterion) {
    let config = SpendingConfig {
        days: 2_500,
        max_rows_per_day: 8,
        seed: Some(3),
        ..Default::default()
    };
    let rows = generate_spending(&config);

    c.bench_function("aggregate_by_date_10k", |b| {
        b.iter(|| aggregate_by(black_box(&rows), |r| r.date))
    });
    c.bench_function("aggregate_by_category_10k", |b| {
        b.iter(|| aggregate_by(black_box(&rows), |r| r.category.clone()))
    });

    let mut csv = Vec::new();
    write_spending(&mut csv, &rows).expect("write csv");
    c.bench_function("read_spending_csv_10k", |b| {
        b.iter(|| read_spending(black_box(csv.as_slice()), &ImportOptions::default()))
    });
}

fn bench_projections(c: &mut Criterion) {
    c.bench_function("compound_interest_monthly_30y", |b| {
        b.iter(|| compound_interest(black_box(dec!(10000)), dec!(6.5), dec!(30), 12))
    });
    c.bench_function("loan_payment_360_months", |b| {
        b.iter(|| loan_monthly_payment(black_box(dec!(350000)), dec!(6.75), 360))
    });
}

criterion_group!(
    benches,
    bench_totals_1000_categories,
    bench_view_events,
    bench_aggregate_10k_rows,
    bench_projections
);
criterion_main!(benches);
