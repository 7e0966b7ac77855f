//! Basic budget planning example.
//!
//! Walks through the planner the way a user would fill it in, then runs
//! the savings and loan calculators.

use budget_engine::core::category::CategoryName;
use budget_engine::core::money::format_currency;
use budget_engine::dashboard::{BudgetView, InputEvent};
use budget_engine::engine::projection::{compound_interest, LoanSummary};
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  budget-engine: Basic Budget Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: Monthly plan ---
    println!("━━━ Scenario 1: Monthly Plan ━━━\n");

    let mut view = BudgetView::with_defaults();
    let events = vec![
        InputEvent::IncomeChanged { income: dec!(4200) },
        InputEvent::ExpenseChanged { category: CategoryName::new("Rent"), amount: dec!(1650) },
        InputEvent::ExpenseChanged { category: CategoryName::new("Food"), amount: dec!(520) },
        InputEvent::ExpenseChanged { category: CategoryName::new("Transport"), amount: dec!(180) },
        InputEvent::ExpenseChanged { category: CategoryName::new("Entertainment"), amount: dec!(240) },
        InputEvent::ExpenseAdded { category: CategoryName::new("Utilities"), amount: dec!(130) },
        InputEvent::GoalChanged { target: dec!(2000) },
    ];
    for event in events {
        let changes = view.apply(event).unwrap_or_else(|e| panic!("rejected: {}", e));
        println!("  redraw: {}", changes);
    }
    println!();
    println!("{}", view.totals());
    println!("{}", view.breakdown());
    println!("Savings Goal: {}\n", view.progress().display());
    println!("{}", view.flow());

    // --- Scenario 2: Overspent month ---
    println!("━━━ Scenario 2: Overspent Month ━━━\n");

    view.apply(InputEvent::ExpenseChanged {
        category: CategoryName::new("Other"),
        amount: dec!(2500),
    })
    .unwrap_or_else(|e| panic!("rejected: {}", e));
    println!("{}", view.totals());
    println!("Savings Goal: {}\n", view.progress().display());

    // --- Scenario 3: Calculators ---
    println!("━━━ Scenario 3: Calculators ━━━\n");

    let principal = dec!(10000);
    let future = compound_interest(principal, dec!(6.5), dec!(15), 12).unwrap_or_else(|e| panic!("{}", e));
    println!("{} at 6.5% for 15 years, monthly: {}", format_currency(principal), format_currency(future));

    let loan = LoanSummary::compute(dec!(25000), dec!(7.9), 60).unwrap_or_else(|e| panic!("{}", e));
    println!("\n$25,000 car loan over 60 months at 7.9%:");
    println!("{}", loan);
}
