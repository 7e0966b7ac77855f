use crate::core::category::CategoryName;
use crate::core::money::{format_currency, format_percent, to_f64};
use crate::core::snapshot::BudgetSnapshot;
use rust_decimal::Decimal;
use serde::Serialize;

/// One slice of the expense pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: CategoryName,
    pub amount: Decimal,
    /// Share of total expenses in `[0, 1]`.
    pub share: Decimal,
}

impl CategoryShare {
    /// Share as a float percentage, for chart libraries.
    pub fn percent_f64(&self) -> f64 {
        to_f64(self.share) * 100.0
    }
}

/// Per-category view of a snapshot's expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseBreakdown {
    pub total_expenses: Decimal,
    pub slices: Vec<CategoryShare>,
}

impl ExpenseBreakdown {
    /// Compute each category's share of total expenses, in display order.
    ///
    /// When total expenses are zero there is nothing to chart and
    /// `slices` is empty.
    pub fn from_snapshot(snapshot: &BudgetSnapshot) -> Self {
        let total_expenses = snapshot.totals().total_expenses;
        if total_expenses.is_zero() {
            return Self {
                total_expenses,
                slices: Vec::new(),
            };
        }

        let slices = snapshot
            .expenses()
            .iter()
            .map(|e| CategoryShare {
                category: e.category().clone(),
                amount: e.amount(),
                share: e.amount() / total_expenses,
            })
            .collect();

        Self {
            total_expenses,
            slices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// The category with the largest amount. Ties go to the first listed.
    pub fn largest(&self) -> Option<&CategoryShare> {
        self.slices
            .iter()
            .fold(None, |best: Option<&CategoryShare>, s| match best {
                Some(b) if b.amount >= s.amount => Some(b),
                _ => Some(s),
            })
    }
}

/// Shorthand for [`ExpenseBreakdown::from_snapshot`].
pub fn category_breakdown(snapshot: &BudgetSnapshot) -> Vec<CategoryShare> {
    ExpenseBreakdown::from_snapshot(snapshot).slices
}

impl std::fmt::Display for ExpenseBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Expense Breakdown ===")?;
        if self.slices.is_empty() {
            return write!(f, "No expenses recorded.");
        }
        for slice in &self.slices {
            writeln!(
                f,
                "  {:<16} {:>14} {:>7}",
                slice.category.as_str(),
                format_currency(slice.amount),
                format_percent(slice.share)
            )?;
        }
        write!(f, "  {:<16} {:>14}", "Total", format_currency(self.total_expenses))
    }
}
