use budget_engine::core::category::CategoryName;
use budget_engine::core::currency::{CurrencyCode, RateTable};
use budget_engine::core::error::BudgetError;
use budget_engine::core::money::{format_currency, format_percent};
use budget_engine::core::snapshot::{BudgetSnapshot, SavingsGoal};
use budget_engine::dashboard::{BudgetView, InputEvent, MarketBoard, MoneyFlow, ViewChanges};
use budget_engine::engine::aggregate::{grand_total, groups_total};
use budget_engine::engine::breakdown::ExpenseBreakdown;
use budget_engine::engine::goal::GoalProgress;
use budget_engine::engine::projection::{compound_interest, loan_monthly_payment, LoanSummary};
use budget_engine::engine::totals::compute_totals;
use budget_engine::import::spending::{by_category, by_date, read_spending, write_spending, ImportOptions};
use budget_engine::market::{
    Availability, CryptoSource, DataUnavailable, Quote, QuoteSource, RateSource, SeriesObservation,
    SeriesSource, Watchlist,
};
use budget_engine::simulation::{generate_spending, SpendingConfig};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::time::Duration;

/// Full pipeline: snapshot → totals → goal → breakdown → flow.
#[test]
fn full_budget_pipeline() {
    let mut snapshot = BudgetSnapshot::with_default_categories(dec!(4000)).unwrap();
    snapshot.set_expense(&CategoryName::new("Rent"), dec!(1500)).unwrap();
    snapshot.set_expense(&CategoryName::new("Food"), dec!(600)).unwrap();
    snapshot.set_expense(&CategoryName::new("Transport"), dec!(200)).unwrap();
    snapshot.set_expense(&CategoryName::new("Entertainment"), dec!(150)).unwrap();
    snapshot.set_expense(&CategoryName::new("Other"), dec!(50)).unwrap();

    // Totals
    let totals = compute_totals(snapshot.income(), snapshot.expenses()).unwrap();
    assert_eq!(totals.total_expenses, dec!(2500));
    assert_eq!(totals.remaining_balance, dec!(1500));
    assert_eq!(totals, snapshot.totals());
    assert_eq!(format_currency(totals.remaining_balance), "$1,500.00");

    // Goal
    let goal = SavingsGoal::new(dec!(2000)).unwrap();
    let progress = goal.progress(totals.remaining_balance);
    assert_eq!(progress, GoalProgress::Ratio(dec!(0.75)));
    assert_eq!(progress.display(), "75.0%");

    // Breakdown
    let breakdown = ExpenseBreakdown::from_snapshot(&snapshot);
    assert_eq!(breakdown.slices.len(), 5);
    assert_eq!(breakdown.largest().unwrap().category.as_str(), "Rent");
    assert_eq!(format_percent(breakdown.slices[0].share), "60.0%");
    let share_sum: Decimal = breakdown.slices.iter().map(|s| s.share).sum();
    assert_eq!(share_sum, Decimal::ONE);

    // Flow
    let flow = MoneyFlow::from_snapshot(&snapshot);
    assert_eq!(flow.nodes.first().map(String::as_str), Some("Income"));
    assert_eq!(flow.nodes.last().map(String::as_str), Some("Savings"));
    assert_eq!(flow.outflow(), snapshot.income());
}

/// The planner as a user drives it, one event at a time.
#[test]
fn budget_view_event_sequence() {
    let mut view = BudgetView::with_defaults();
    assert_eq!(view.totals().remaining_balance, Decimal::ZERO);

    let changes = view.apply(InputEvent::IncomeChanged { income: dec!(3000) }).unwrap();
    assert!(!changes.contains(ViewChanges::BREAKDOWN));

    view.apply(InputEvent::ExpenseChanged {
        category: CategoryName::new("Rent"),
        amount: dec!(1200),
    })
    .unwrap();
    view.apply(InputEvent::ExpenseAdded {
        category: CategoryName::new("Gym"),
        amount: dec!(50),
    })
    .unwrap();
    assert_eq!(view.progress(), GoalProgress::NoGoalSet);

    let changes = view.apply(InputEvent::GoalChanged { target: dec!(3500) }).unwrap();
    assert_eq!(changes, ViewChanges::GOAL);
    assert_eq!(view.totals().remaining_balance, dec!(1750));
    assert_eq!(view.progress(), GoalProgress::Ratio(dec!(0.5)));

    // Overspend is representable and clamps progress to zero.
    view.apply(InputEvent::ExpenseChanged {
        category: CategoryName::new("Other"),
        amount: dec!(2000),
    })
    .unwrap();
    assert!(view.totals().is_overspent());
    assert_eq!(view.totals().remaining_balance, dec!(-250));
    assert_eq!(view.progress(), GoalProgress::Ratio(Decimal::ZERO));
    assert_eq!(format_currency(view.totals().remaining_balance), "-$250.00");

    let err = view
        .apply(InputEvent::ExpenseRemoved { category: CategoryName::new("Travel") })
        .unwrap_err();
    assert_eq!(err, BudgetError::UnknownCategory("Travel".into()));
}

#[test]
fn projections_match_known_values() {
    let fv = compound_interest(dec!(1000), dec!(5.0), dec!(10), 1).unwrap();
    assert_eq!(fv.round_dp(2), dec!(1628.89));

    let payment = loan_monthly_payment(dec!(10000), dec!(5.0), 60).unwrap();
    assert_eq!(payment.round_dp(2), dec!(188.71));

    let flat = loan_monthly_payment(dec!(10000), dec!(0), 60).unwrap();
    assert_eq!(flat.round_dp(2), dec!(166.67));

    let summary = LoanSummary::compute(dec!(10000), dec!(5.0), 60).unwrap();
    assert!(summary.total_interest > Decimal::ZERO);
    assert_eq!(summary.total_paid - summary.total_interest, dec!(10000));

    assert!(matches!(
        loan_monthly_payment(dec!(10000), dec!(5), 0),
        Err(BudgetError::ZeroDivision(_))
    ));
    assert!(compound_interest(dec!(1000), dec!(5), dec!(1), 0).unwrap_err().is_invalid_input());
}

/// CSV → rows → grouped views, with conservation of the total.
#[test]
fn csv_aggregation_pipeline() {
    let csv = "\
Date,Amount,Category
2024-05-01,42.10,Food
2024-05-01,1200,Rent
2024-05-02,18.40,Transport
2024-05-03,-10.00,Food
2024-05-03,65.00,Entertainment
";
    let rows = read_spending(csv.as_bytes(), &ImportOptions::default()).unwrap();
    assert_eq!(rows.len(), 5);

    let daily = by_date(&rows).unwrap();
    assert_eq!(daily.len(), 3);
    assert_eq!(daily[&NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()], dec!(55.00));

    let per_category = by_category(&rows).unwrap();
    assert_eq!(per_category[&CategoryName::new("Food")], dec!(32.10));

    let total = grand_total(&rows).unwrap();
    assert_eq!(total, dec!(1315.50));
    assert_eq!(groups_total(&daily).unwrap(), total);
    assert_eq!(groups_total(&per_category).unwrap(), total);
}

#[test]
fn generated_spending_survives_csv() {
    let config = SpendingConfig {
        days: 14,
        seed: Some(99),
        ..Default::default()
    };
    let rows = generate_spending(&config);

    let mut buffer = Vec::new();
    write_spending(&mut buffer, &rows).unwrap();
    let parsed = read_spending(buffer.as_slice(), &ImportOptions::default()).unwrap();

    assert_eq!(grand_total(&parsed).unwrap(), grand_total(&rows).unwrap());
    assert_eq!(by_category(&parsed).unwrap(), by_category(&rows).unwrap());
}

// ---------------------------------------------------------------------------
// Market board with in-memory collaborators
// ---------------------------------------------------------------------------

struct FixedQuotes;

impl QuoteSource for FixedQuotes {
    async fn quote(&self, symbol: &str) -> Result<Quote, DataUnavailable> {
        if symbol == "^DJI" {
            return Err(DataUnavailable::Malformed("empty chart".into()));
        }
        Ok(Quote {
            symbol: symbol.to_string(),
            price: Some(dec!(100)),
            ..Default::default()
        })
    }
}

struct FixedRates;

impl RateSource for FixedRates {
    async fn latest_rates(
        &self,
        base: &CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> Result<RateTable, DataUnavailable> {
        let mut table = RateTable::new(base.clone());
        for symbol in symbols {
            table
                .insert(symbol.clone(), dec!(0.5))
                .map_err(|e| DataUnavailable::Malformed(e.to_string()))?;
        }
        Ok(table)
    }
}

struct DownCrypto;

impl CryptoSource for DownCrypto {
    async fn prices(
        &self,
        _coins: &[String],
        _vs_currency: &str,
    ) -> Result<BTreeMap<String, Decimal>, DataUnavailable> {
        Err(DataUnavailable::Status(429))
    }
}

struct StalledSeries;

impl SeriesSource for StalledSeries {
    async fn latest(&self, series_id: &str) -> Result<SeriesObservation, DataUnavailable> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(SeriesObservation {
            series_id: series_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value: Decimal::ONE,
        })
    }
}

#[tokio::test]
async fn market_board_isolates_failures() {
    let board = MarketBoard::new(
        FixedQuotes,
        FixedRates,
        FixedRates,
        DownCrypto,
        StalledSeries,
        Duration::from_millis(50),
    );
    let snapshot = board.refresh(&Watchlist::default()).await;

    assert!(snapshot.stock.data.is_available());
    assert!(snapshot.currencies.iter().all(|t| t.data == Availability::Available(dec!(0.5))));
    assert!(snapshot.commodities.iter().all(|t| t.data == Availability::Available(dec!(2))));
    assert!(snapshot
        .coins
        .iter()
        .all(|t| t.data == Availability::Unavailable(DataUnavailable::Status(429))));
    assert!(snapshot
        .series
        .iter()
        .all(|t| t.data == Availability::Unavailable(DataUnavailable::Timeout(Duration::from_millis(50)))));

    let down: Vec<&str> = snapshot
        .indices
        .iter()
        .filter(|t| !t.data.is_available())
        .map(|t| t.label.as_str())
        .collect();
    assert_eq!(down, vec!["Dow Jones"]);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["coins"][0]["status"], "unavailable");
    assert_eq!(json["stock"]["status"], "available");
}
