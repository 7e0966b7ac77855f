//! Pure budget computations: totals, goal progress, projections and
//! grouping. Nothing here holds state or performs I/O.

pub mod aggregate;
pub mod breakdown;
pub mod goal;
pub mod projection;
pub mod totals;

pub use aggregate::{aggregate_by, HasAmount};
pub use breakdown::{category_breakdown, CategoryShare, ExpenseBreakdown};
pub use goal::{compute_goal_progress, GoalProgress};
pub use projection::{compound_interest, loan_monthly_payment, LoanSummary};
pub use totals::{compute_totals, BudgetTotals};
