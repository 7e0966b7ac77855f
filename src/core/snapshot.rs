use crate::core::category::CategoryName;
use crate::core::error::{ensure_non_negative, BudgetError, BudgetResult};
use crate::engine::goal::{compute_goal_progress, GoalProgress};
use crate::engine::totals::{checked_total, BudgetTotals};
use rust_decimal::Decimal;
use serde::Serialize;

/// Categories the budget planner starts with.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Rent", "Food", "Transport", "Entertainment", "Other"];

/// One line of a budget: a category and the amount planned for it.
///
/// The amount is never negative; construction rejects it.
///
/// # Examples
///
/// ```
/// use budget_engine::core::snapshot::ExpenseEntry;
/// use rust_decimal_macros::dec;
///
/// let rent = ExpenseEntry::new("Rent", dec!(300)).unwrap();
/// assert_eq!(rent.amount(), dec!(300));
/// assert!(ExpenseEntry::new("Rent", dec!(-1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseEntry {
    category: CategoryName,
    amount: Decimal,
}

impl ExpenseEntry {
    pub fn new(category: impl Into<CategoryName>, amount: Decimal) -> BudgetResult<Self> {
        Ok(Self {
            category: category.into(),
            amount: ensure_non_negative("expense amount", amount)?,
        })
    }

    pub fn category(&self) -> &CategoryName {
        &self.category
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// The income and expenses currently being evaluated.
///
/// Totals are derived on demand and never stored, so they cannot go
/// stale when an input changes. Expense order is kept for display only.
/// The sum of all expenses always fits in a decimal: a change that would
/// overflow it is rejected and leaves the snapshot as it was.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BudgetSnapshot {
    income: Decimal,
    expenses: Vec<ExpenseEntry>,
}

impl BudgetSnapshot {
    /// Create an empty snapshot with the given monthly income.
    pub fn new(income: Decimal) -> BudgetResult<Self> {
        Ok(Self {
            income: ensure_non_negative("income", income)?,
            expenses: Vec::new(),
        })
    }

    /// Snapshot with the planner's default categories, all at zero.
    pub fn with_default_categories(income: Decimal) -> BudgetResult<Self> {
        let mut snapshot = Self::new(income)?;
        for name in DEFAULT_CATEGORIES {
            snapshot.add_expense(name, Decimal::ZERO)?;
        }
        Ok(snapshot)
    }

    /// Zero income and the default categories at zero, as the planner opens.
    pub fn default_planner() -> Self {
        Self {
            income: Decimal::ZERO,
            expenses: DEFAULT_CATEGORIES
                .iter()
                .map(|name| ExpenseEntry {
                    category: CategoryName::new(*name),
                    amount: Decimal::ZERO,
                })
                .collect(),
        }
    }

    /// Build a snapshot from `(category, amount)` pairs.
    pub fn from_pairs<C, I>(income: Decimal, pairs: I) -> BudgetResult<Self>
    where
        C: Into<CategoryName>,
        I: IntoIterator<Item = (C, Decimal)>,
    {
        let mut snapshot = Self::new(income)?;
        for (category, amount) in pairs {
            snapshot.add_expense(category, amount)?;
        }
        Ok(snapshot)
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn set_income(&mut self, income: Decimal) -> BudgetResult<()> {
        self.income = ensure_non_negative("income", income)?;
        Ok(())
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Amount planned for `category`, if present.
    pub fn expense(&self, category: &CategoryName) -> Option<Decimal> {
        self.position(category).map(|i| self.expenses[i].amount)
    }

    /// Append a new category. Fails if the category already exists or the
    /// new total would overflow.
    pub fn add_expense(
        &mut self,
        category: impl Into<CategoryName>,
        amount: Decimal,
    ) -> BudgetResult<()> {
        let entry = ExpenseEntry::new(category, amount)?;
        if self.position(&entry.category).is_some() {
            return Err(BudgetError::DuplicateCategory(entry.category.to_string()));
        }
        self.total_without(None, entry.amount)?;
        self.expenses.push(entry);
        Ok(())
    }

    /// Change the amount of an existing category, keeping its position.
    pub fn set_expense(&mut self, category: &CategoryName, amount: Decimal) -> BudgetResult<()> {
        let amount = ensure_non_negative("expense amount", amount)?;
        let idx = self
            .position(category)
            .ok_or_else(|| BudgetError::UnknownCategory(category.to_string()))?;
        self.total_without(Some(idx), amount)?;
        self.expenses[idx].amount = amount;
        Ok(())
    }

    /// Remove a category and return its amount.
    pub fn remove_expense(&mut self, category: &CategoryName) -> BudgetResult<Decimal> {
        let idx = self
            .position(category)
            .ok_or_else(|| BudgetError::UnknownCategory(category.to_string()))?;
        Ok(self.expenses.remove(idx).amount)
    }

    /// Total expenses and remaining balance.
    pub fn totals(&self) -> BudgetTotals {
        // Every mutation keeps the sum in range, so this never saturates.
        let total_expenses = self
            .expenses
            .iter()
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount));
        BudgetTotals {
            income: self.income,
            total_expenses,
            remaining_balance: self.income - total_expenses,
        }
    }

    /// Expense total with the entry at `skip` replaced by `amount`.
    fn total_without(&self, skip: Option<usize>, amount: Decimal) -> BudgetResult<Decimal> {
        self.expenses
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .try_fold(amount, |total, (_, e)| checked_total(total, e.amount))
    }

    fn position(&self, category: &CategoryName) -> Option<usize> {
        self.expenses.iter().position(|e| &e.category == category)
    }
}

/// A savings target. Zero means "no goal set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SavingsGoal(Decimal);

impl SavingsGoal {
    pub fn new(target: Decimal) -> BudgetResult<Self> {
        Ok(Self(ensure_non_negative("goal", target)?))
    }

    pub fn none() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn target(&self) -> Decimal {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Progress of `remaining` towards this goal.
    pub fn progress(&self, remaining: Decimal) -> GoalProgress {
        // The target is non-negative by construction, so this cannot fail.
        compute_goal_progress(remaining, self.0).unwrap_or(GoalProgress::NoGoalSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> BudgetSnapshot {
        BudgetSnapshot::from_pairs(dec!(1000), [("Rent", dec!(300)), ("Food", dec!(200))]).unwrap()
    }

    #[test]
    fn test_snapshot_totals() {
        let totals = sample().totals();
        assert_eq!(totals.total_expenses, dec!(500));
        assert_eq!(totals.remaining_balance, dec!(500));
    }

    #[test]
    fn test_default_categories() {
        let snapshot = BudgetSnapshot::with_default_categories(dec!(2500)).unwrap();
        let names: Vec<&str> = snapshot
            .expenses()
            .iter()
            .map(|e| e.category().as_str())
            .collect();
        assert_eq!(names, DEFAULT_CATEGORIES);
        assert_eq!(snapshot.totals().remaining_balance, dec!(2500));

        let mut opened = BudgetSnapshot::default_planner();
        assert_eq!(opened.len(), DEFAULT_CATEGORIES.len());
        opened.set_income(dec!(2500)).unwrap();
        assert_eq!(opened, snapshot);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut snapshot = sample();
        let err = snapshot.add_expense(" Rent", dec!(10)).unwrap_err();
        assert_eq!(err, BudgetError::DuplicateCategory("Rent".into()));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_negative_income_rejected() {
        assert!(BudgetSnapshot::new(dec!(-1)).unwrap_err().is_invalid_input());
        let mut snapshot = sample();
        assert!(snapshot.set_income(dec!(-0.5)).is_err());
        assert_eq!(snapshot.income(), dec!(1000));
    }

    #[test]
    fn test_set_expense_keeps_order() {
        let mut snapshot = sample();
        snapshot
            .set_expense(&CategoryName::new("Rent"), dec!(450))
            .unwrap();
        assert_eq!(snapshot.expenses()[0].category().as_str(), "Rent");
        assert_eq!(snapshot.expenses()[0].amount(), dec!(450));
        assert_eq!(snapshot.totals().remaining_balance, dec!(350));
    }

    #[test]
    fn test_set_unknown_expense() {
        let mut snapshot = sample();
        let err = snapshot
            .set_expense(&CategoryName::new("Travel"), dec!(1))
            .unwrap_err();
        assert_eq!(err, BudgetError::UnknownCategory("Travel".into()));
    }

    #[test]
    fn test_remove_expense() {
        let mut snapshot = sample();
        let removed = snapshot.remove_expense(&CategoryName::new("Food")).unwrap();
        assert_eq!(removed, dec!(200));
        assert_eq!(snapshot.totals().total_expenses, dec!(300));
        assert!(snapshot.expense(&CategoryName::new("Food")).is_none());
    }

    #[test]
    fn test_overspend_is_representable() {
        let snapshot =
            BudgetSnapshot::from_pairs(dec!(100), [("Rent", dec!(300))]).unwrap();
        assert_eq!(snapshot.totals().remaining_balance, dec!(-200));
    }

    #[test]
    fn test_overflowing_expense_rejected() {
        let mut snapshot = BudgetSnapshot::from_pairs(Decimal::MAX, [("Rent", Decimal::MAX)]).unwrap();
        let before = snapshot.clone();

        let err = snapshot.add_expense("Food", Decimal::MAX).unwrap_err();
        assert_eq!(err, BudgetError::Overflow("total expenses"));
        snapshot.add_expense("Food", dec!(0)).unwrap();
        let err = snapshot
            .set_expense(&CategoryName::new("Food"), dec!(1))
            .unwrap_err();
        assert_eq!(err, BudgetError::Overflow("total expenses"));
        snapshot.remove_expense(&CategoryName::new("Food")).unwrap();
        assert_eq!(snapshot, before);

        // Replacing the only large entry is not counted twice.
        snapshot
            .set_expense(&CategoryName::new("Rent"), Decimal::MAX)
            .unwrap();
        assert_eq!(snapshot.totals().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_savings_goal() {
        assert!(!SavingsGoal::none().is_set());
        assert!(SavingsGoal::new(dec!(-10)).is_err());
        let goal = SavingsGoal::new(dec!(1000)).unwrap();
        assert_eq!(goal.progress(dec!(500)), GoalProgress::Ratio(dec!(0.5)));
        assert_eq!(SavingsGoal::none().progress(dec!(500)), GoalProgress::NoGoalSet);
    }
}
