use budget_engine::core::error::BudgetError;
use budget_engine::core::snapshot::{BudgetSnapshot, ExpenseEntry, SavingsGoal};
use budget_engine::dashboard::{BudgetView, InputEvent, MoneyFlow};
use budget_engine::engine::aggregate::{aggregate_by, grand_total, groups_total};
use budget_engine::engine::breakdown::ExpenseBreakdown;
use budget_engine::engine::goal::{compute_goal_progress, GoalProgress};
use budget_engine::engine::projection::{compound_interest, loan_monthly_payment};
use budget_engine::engine::totals::{compute_totals, compute_totals_from_amounts};
use budget_engine::import::spending::SpendingRow;
use budget_engine::core::category::CategoryName;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Non-negative amount in cents, up to $1,000,000.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any amount in cents, including overspent balances and refunds.
fn arb_signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any non-negative decimal, up to `Decimal::MAX`, at any scale.
fn arb_extreme() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, scale)| Decimal::from_parts(lo, mid, hi, false, scale))
}

/// Expense lines with distinct category names.
fn arb_expenses() -> impl Strategy<Value = Vec<ExpenseEntry>> {
    prop::collection::vec(arb_amount(), 0..20).prop_map(|amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| ExpenseEntry::new(format!("Category {}", i), amount).unwrap())
            .collect()
    })
}

/// Spending rows drawn from a small pool of dates and categories.
fn arb_rows() -> impl Strategy<Value = Vec<SpendingRow>> {
    let row = (1u32..=28, 0usize..4, arb_signed_amount()).prop_map(|(day, cat, amount)| SpendingRow {
        date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
        amount,
        category: CategoryName::new(["Rent", "Food", "Travel", "Other"][cat]),
    });
    prop::collection::vec(row, 0..60)
}

proptest! {
    // ===================================================================
    // INVARIANT 1: remaining == income - Σ expenses, exactly.
    //
    // Decimal arithmetic never loses a cent, whatever the amounts.
    // ===================================================================
    #[test]
    fn remaining_balance_is_exact(income in arb_amount(), expenses in arb_expenses()) {
        let totals = compute_totals(income, &expenses).unwrap();
        let sum: Decimal = expenses.iter().map(|e| e.amount()).sum();
        prop_assert_eq!(totals.total_expenses, sum);
        prop_assert_eq!(totals.remaining_balance, income - sum);
        prop_assert!(totals.total_expenses >= Decimal::ZERO);
    }

    // ===================================================================
    // INVARIANT 2: Totals do not depend on insertion order.
    // ===================================================================
    #[test]
    fn totals_are_order_independent(income in arb_amount(), expenses in arb_expenses()) {
        let forward = compute_totals(income, &expenses).unwrap();
        let reversed: Vec<ExpenseEntry> = expenses.iter().rev().cloned().collect();
        let backward = compute_totals(income, &reversed).unwrap();
        prop_assert_eq!(forward, backward);

        let snapshot = BudgetSnapshot::from_pairs(
            income,
            reversed.iter().map(|e| (e.category().clone(), e.amount())),
        ).unwrap();
        prop_assert_eq!(snapshot.totals(), forward);
    }

    // ===================================================================
    // INVARIANT 3: Goal progress is always within [0, 1].
    //
    // Overspending clamps to 0, overshooting clamps to 1, a zero goal is
    // "no goal set" rather than a division by zero.
    // ===================================================================
    #[test]
    fn goal_progress_is_clamped(remaining in arb_signed_amount(), goal in arb_amount()) {
        match compute_goal_progress(remaining, goal).unwrap() {
            GoalProgress::Ratio(r) => {
                prop_assert!(goal > Decimal::ZERO);
                prop_assert!(r >= Decimal::ZERO && r <= Decimal::ONE);
                if remaining <= Decimal::ZERO {
                    prop_assert_eq!(r, Decimal::ZERO);
                }
                if remaining >= goal {
                    prop_assert_eq!(r, Decimal::ONE);
                }
            }
            GoalProgress::NoGoalSet => prop_assert!(goal.is_zero()),
        }
    }

    // ===================================================================
    // INVARIANT 4: Negative inputs are rejected, never clamped.
    // ===================================================================
    #[test]
    fn negative_inputs_are_rejected(cents in 1i64..100_000_000i64) {
        let negative = Decimal::new(-cents, 2);
        prop_assert!(compute_totals(negative, std::iter::empty()).unwrap_err().is_invalid_input());
        prop_assert!(ExpenseEntry::new("Rent", negative).is_err());
        prop_assert!(compute_goal_progress(Decimal::ZERO, negative).unwrap_err().is_invalid_input());
        prop_assert!(SavingsGoal::new(negative).is_err());
        prop_assert!(loan_monthly_payment(Decimal::ONE_HUNDRED, negative, 12).is_err());
    }

    // ===================================================================
    // INVARIANT 5: Σ group sums == ungrouped total, for any key.
    // ===================================================================
    #[test]
    fn aggregation_conserves_total(rows in arb_rows()) {
        let total = grand_total(&rows).unwrap();
        let by_date = aggregate_by(&rows, |r| r.date).unwrap();
        let by_category = aggregate_by(&rows, |r| r.category.clone()).unwrap();
        let by_weekday = aggregate_by(&rows, |r| r.date.format("%a").to_string()).unwrap();
        prop_assert_eq!(groups_total(&by_date).unwrap(), total);
        prop_assert_eq!(groups_total(&by_category).unwrap(), total);
        prop_assert_eq!(groups_total(&by_weekday).unwrap(), total);
        prop_assert!(by_category.len() <= 4);
    }

    // ===================================================================
    // INVARIANT 6: Every engine function is idempotent.
    // ===================================================================
    #[test]
    fn engine_functions_are_idempotent(
        principal in arb_amount(),
        rate_tenths in 0u32..300,
        years in 0u32..40,
        n in 1u32..13,
        months in 1u32..361,
    ) {
        let rate = Decimal::new(i64::from(rate_tenths), 1);
        let years = Decimal::from(years);
        prop_assert_eq!(
            compound_interest(principal, rate, years, n),
            compound_interest(principal, rate, years, n)
        );
        prop_assert_eq!(
            loan_monthly_payment(principal, rate, months),
            loan_monthly_payment(principal, rate, months)
        );
        prop_assert_eq!(
            compute_goal_progress(principal, rate),
            compute_goal_progress(principal, rate)
        );
    }

    // ===================================================================
    // INVARIANT 7: A zero-rate loan splits evenly and a positive rate
    // always costs more.
    // ===================================================================
    #[test]
    fn loan_payment_bounds(loan in arb_amount(), rate_tenths in 1u32..300, months in 1u32..361) {
        let flat = loan_monthly_payment(loan, Decimal::ZERO, months).unwrap();
        prop_assert_eq!(flat, loan / Decimal::from(months));
        let with_interest = loan_monthly_payment(loan, Decimal::new(i64::from(rate_tenths), 1), months).unwrap();
        prop_assert!(with_interest >= flat);
    }

    // ===================================================================
    // INVARIANT 8: Category shares sum to 1 and the flow conserves income.
    // ===================================================================
    #[test]
    fn shares_and_flow_are_consistent(income in arb_amount(), expenses in arb_expenses()) {
        let snapshot = BudgetSnapshot::from_pairs(
            income,
            expenses.iter().map(|e| (e.category().clone(), e.amount())),
        ).unwrap();
        let breakdown = ExpenseBreakdown::from_snapshot(&snapshot);
        if breakdown.total_expenses > Decimal::ZERO {
            let sum: Decimal = breakdown.slices.iter().map(|s| s.share).sum();
            prop_assert!((sum - Decimal::ONE).abs() < Decimal::new(1, 20));
        } else {
            prop_assert!(breakdown.is_empty());
        }

        let flow = MoneyFlow::from_snapshot(&snapshot);
        let totals = snapshot.totals();
        prop_assert_eq!(flow.outflow(), totals.total_expenses.max(income));
    }

    // ===================================================================
    // INVARIANT 9: Amounts anywhere in the decimal range never panic.
    //
    // Every call returns a value or an error; a rejected view event
    // leaves the derived values exactly as they were.
    // ===================================================================
    #[test]
    fn extreme_amounts_never_panic(
        income in arb_extreme(),
        amounts in prop::collection::vec(arb_extreme(), 0..6),
        rate in arb_extreme(),
        months in 0u32..600,
    ) {
        match compute_totals_from_amounts(income, amounts.iter().copied()) {
            Ok(totals) => prop_assert_eq!(totals.remaining_balance, income - totals.total_expenses),
            Err(err) => prop_assert_eq!(err, BudgetError::Overflow("total expenses")),
        }

        for remaining in [income, -income] {
            match compute_goal_progress(remaining, rate).unwrap() {
                GoalProgress::Ratio(r) => prop_assert!(r >= Decimal::ZERO && r <= Decimal::ONE),
                GoalProgress::NoGoalSet => prop_assert!(rate.is_zero()),
            }
        }

        match compound_interest(income, rate, Decimal::from(months), 12) {
            Ok(fv) => prop_assert!(fv >= Decimal::ZERO),
            Err(err) => prop_assert!(matches!(err, BudgetError::Overflow(_)), "got {:?}", err),
        }

        match loan_monthly_payment(income, rate, months) {
            Ok(payment) => prop_assert!(payment >= Decimal::ZERO),
            Err(err) => prop_assert!(
                matches!(err, BudgetError::Overflow(_) | BudgetError::ZeroDivision(_)),
                "got {:?}", err
            ),
        }
        if months == 0 {
            prop_assert_eq!(
                loan_monthly_payment(income, rate, months).unwrap_err(),
                BudgetError::ZeroDivision("term_months")
            );
        }

        let mut view = BudgetView::new(BudgetSnapshot::new(income).unwrap(), SavingsGoal::none());
        for (i, amount) in amounts.iter().enumerate() {
            let totals = *view.totals();
            let flow = view.flow().clone();
            let event = InputEvent::ExpenseAdded {
                category: CategoryName::new(format!("Category {}", i)),
                amount: *amount,
            };
            if let Err(err) = view.apply(event) {
                prop_assert_eq!(err, BudgetError::Overflow("total expenses"));
                prop_assert_eq!(*view.totals(), totals);
                prop_assert_eq!(view.flow(), &flow);
            }
        }
    }
}
