//! # budget-engine
//!
//! Budget computation and aggregation for a personal-finance dashboard.
//!
//! Given a monthly income, a set of categorized expenses and a savings
//! goal, the engine derives totals, the remaining balance and goal
//! progress. It also projects compound growth and loan payments and
//! groups raw spending records by any key.
//!
//! ## Architecture
//!
//! - **core** — Domain types: categories, snapshots, currencies, errors, formatting
//! - **engine** — Pure computations: totals, goal progress, projections, grouping
//! - **import** — Spending CSV parsing and per-date / per-category views
//! - **market** — Market-data collaborator traits, HTTP adapters and config
//! - **dashboard** — Event-driven budget view, money flow, the market board and reference content
//! - **simulation** — Random spending data for demos and benchmarks

pub mod core;
pub mod dashboard;
pub mod engine;
pub mod import;
pub mod market;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::category::CategoryName;
    pub use crate::core::currency::{CurrencyCode, RateTable};
    pub use crate::core::error::{BudgetError, BudgetResult};
    pub use crate::core::money::{format_currency, format_percent};
    pub use crate::core::snapshot::{BudgetSnapshot, ExpenseEntry, SavingsGoal};
    pub use crate::dashboard::{BudgetView, InputEvent, MoneyFlow, ViewChanges};
    pub use crate::engine::{
        aggregate_by, compound_interest, compute_goal_progress, compute_totals, loan_monthly_payment,
        BudgetTotals, ExpenseBreakdown, GoalProgress, LoanSummary,
    };
    pub use crate::import::{read_spending, ImportOptions, SpendingRow};
    pub use crate::market::{Availability, DataUnavailable, MarketConfig, Watchlist};
}
