use crate::core::error::{ensure_non_negative, BudgetError, BudgetResult};
use crate::core::money::format_currency;
use crate::core::snapshot::ExpenseEntry;
use rust_decimal::Decimal;
use serde::Serialize;

/// Totals derived from an income and a set of expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetTotals {
    pub income: Decimal,
    /// Sum of all expense amounts. Never negative.
    pub total_expenses: Decimal,
    /// `income - total_expenses`. Negative when overspent.
    pub remaining_balance: Decimal,
}

impl BudgetTotals {
    pub fn is_overspent(&self) -> bool {
        self.remaining_balance < Decimal::ZERO
    }
}

impl std::fmt::Display for BudgetTotals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Budget ===")?;
        writeln!(f, "Income:     {}", format_currency(self.income))?;
        writeln!(f, "Expenses:   {}", format_currency(self.total_expenses))?;
        write!(f, "Remaining:  {}", format_currency(self.remaining_balance))?;
        if self.is_overspent() {
            write!(f, "  (overspent)")?;
        }
        Ok(())
    }
}

/// Compute total expenses and the remaining balance.
///
/// `income` and every expense amount must be non-negative; anything else is
/// rejected with [`BudgetError::InvalidInput`]. A sum too large for a
/// decimal is [`BudgetError::Overflow`]. The sum is exact decimal arithmetic, so the result does not depend on
/// the order of `expenses`.
///
/// # Examples
///
/// ```
/// use budget_engine::core::snapshot::ExpenseEntry;
/// use budget_engine::engine::totals::compute_totals;
/// use rust_decimal_macros::dec;
///
/// let expenses = [
///     ExpenseEntry::new("Rent", dec!(300)).unwrap(),
///     ExpenseEntry::new("Food", dec!(200)).unwrap(),
/// ];
/// let totals = compute_totals(dec!(1000), &expenses).unwrap();
/// assert_eq!(totals.total_expenses, dec!(500));
/// assert_eq!(totals.remaining_balance, dec!(500));
/// ```
pub fn compute_totals<'a>(
    income: Decimal,
    expenses: impl IntoIterator<Item = &'a ExpenseEntry>,
) -> BudgetResult<BudgetTotals> {
    compute_totals_from_amounts(income, expenses.into_iter().map(|e| e.amount()))
}

/// Same as [`compute_totals`] over bare amounts, e.g. a category map.
pub fn compute_totals_from_amounts(
    income: Decimal,
    amounts: impl IntoIterator<Item = Decimal>,
) -> BudgetResult<BudgetTotals> {
    let income = ensure_non_negative("income", income)?;
    let mut total_expenses = Decimal::ZERO;
    for amount in amounts {
        let amount = ensure_non_negative("expense amount", amount)?;
        total_expenses = checked_total(total_expenses, amount)?;
    }
    Ok(BudgetTotals {
        income,
        total_expenses,
        // Both sides are non-negative, so the difference always fits.
        remaining_balance: income - total_expenses,
    })
}

/// Add one non-negative amount to a running expense total.
pub(crate) fn checked_total(total: Decimal, amount: Decimal) -> BudgetResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or(BudgetError::Overflow("total expenses"))
}
