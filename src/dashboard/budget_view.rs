//! Event-driven budget planner state.
//!
//! A renderer feeds [`InputEvent`]s into a [`BudgetView`] and redraws the
//! views named in the returned [`ViewChanges`]. Derived values are
//! recomputed from the snapshot in the same call that changed it.

use crate::core::category::CategoryName;
use crate::core::error::BudgetResult;
use crate::core::snapshot::{BudgetSnapshot, SavingsGoal};
use crate::dashboard::money_flow::MoneyFlow;
use crate::engine::breakdown::ExpenseBreakdown;
use crate::engine::goal::GoalProgress;
use crate::engine::totals::BudgetTotals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    IncomeChanged { income: Decimal },
    ExpenseChanged { category: CategoryName, amount: Decimal },
    ExpenseAdded { category: CategoryName, amount: Decimal },
    ExpenseRemoved { category: CategoryName },
    GoalChanged { target: Decimal },
}

/// Set of views that need a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ViewChanges(u8);

impl ViewChanges {
    pub const NONE: Self = Self(0);
    /// Income / expenses / remaining metric tiles.
    pub const METRICS: Self = Self(1);
    /// Expense pie chart.
    pub const BREAKDOWN: Self = Self(1 << 1);
    /// Savings goal progress bar.
    pub const GOAL: Self = Self(1 << 2);
    /// Money-flow Sankey chart.
    pub const FLOW: Self = Self(1 << 3);
    pub const ALL: Self = Self(0b1111);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ViewChanges {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ViewChanges {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ViewChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::METRICS, "metrics"),
            (Self::BREAKDOWN, "breakdown"),
            (Self::GOAL, "goal"),
            (Self::FLOW, "flow"),
        ];
        let parts: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join("|"))
        }
    }
}

/// Planner inputs plus everything derived from them.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetView {
    snapshot: BudgetSnapshot,
    goal: SavingsGoal,
    totals: BudgetTotals,
    breakdown: ExpenseBreakdown,
    progress: GoalProgress,
    flow: MoneyFlow,
}

impl BudgetView {
    pub fn new(snapshot: BudgetSnapshot, goal: SavingsGoal) -> Self {
        let totals = snapshot.totals();
        Self {
            breakdown: ExpenseBreakdown::from_snapshot(&snapshot),
            progress: goal.progress(totals.remaining_balance),
            flow: MoneyFlow::from_snapshot(&snapshot),
            totals,
            snapshot,
            goal,
        }
    }

    /// The planner as first opened: zero income, default categories, no goal.
    pub fn with_defaults() -> Self {
        Self::new(BudgetSnapshot::default_planner(), SavingsGoal::none())
    }

    /// Apply one edit and recompute whatever depends on it.
    ///
    /// Rejected input leaves the view untouched. An edit that does not
    /// change any value reports [`ViewChanges::NONE`].
    pub fn apply(&mut self, event: InputEvent) -> BudgetResult<ViewChanges> {
        let changes = match event {
            InputEvent::IncomeChanged { income } => {
                if income == self.snapshot.income() {
                    ViewChanges::NONE
                } else {
                    self.snapshot.set_income(income)?;
                    // Shares depend on expenses only.
                    ViewChanges::METRICS | ViewChanges::GOAL | ViewChanges::FLOW
                }
            }
            InputEvent::ExpenseChanged { category, amount } => {
                let before = self.snapshot.expense(&category);
                self.snapshot.set_expense(&category, amount)?;
                if before == Some(amount) {
                    ViewChanges::NONE
                } else {
                    ViewChanges::ALL
                }
            }
            InputEvent::ExpenseAdded { category, amount } => {
                self.snapshot.add_expense(category, amount)?;
                ViewChanges::ALL
            }
            InputEvent::ExpenseRemoved { category } => {
                self.snapshot.remove_expense(&category)?;
                ViewChanges::ALL
            }
            InputEvent::GoalChanged { target } => {
                let goal = SavingsGoal::new(target)?;
                if goal == self.goal {
                    ViewChanges::NONE
                } else {
                    self.goal = goal;
                    ViewChanges::GOAL
                }
            }
        };
        self.recompute(changes);
        log::debug!("view changes: {}", changes);
        Ok(changes)
    }

    fn recompute(&mut self, changes: ViewChanges) {
        if changes.contains(ViewChanges::METRICS) {
            self.totals = self.snapshot.totals();
        }
        if changes.contains(ViewChanges::BREAKDOWN) {
            self.breakdown = ExpenseBreakdown::from_snapshot(&self.snapshot);
        }
        if changes.contains(ViewChanges::GOAL) {
            self.progress = self.goal.progress(self.snapshot.totals().remaining_balance);
        }
        if changes.contains(ViewChanges::FLOW) {
            self.flow = MoneyFlow::from_snapshot(&self.snapshot);
        }
    }

    pub fn snapshot(&self) -> &BudgetSnapshot {
        &self.snapshot
    }

    pub fn goal(&self) -> SavingsGoal {
        self.goal
    }

    pub fn totals(&self) -> &BudgetTotals {
        &self.totals
    }

    pub fn breakdown(&self) -> &ExpenseBreakdown {
        &self.breakdown
    }

    pub fn progress(&self) -> GoalProgress {
        self.progress
    }

    pub fn flow(&self) -> &MoneyFlow {
        &self.flow
    }
}
