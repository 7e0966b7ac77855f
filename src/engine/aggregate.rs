use crate::core::error::{BudgetError, BudgetResult};
use crate::core::snapshot::ExpenseEntry;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Anything that carries a monetary amount that can be summed.
pub trait HasAmount {
    fn amount(&self) -> Decimal;
}

impl HasAmount for ExpenseEntry {
    fn amount(&self) -> Decimal {
        ExpenseEntry::amount(self)
    }
}

impl<T: HasAmount + ?Sized> HasAmount for &T {
    fn amount(&self) -> Decimal {
        (**self).amount()
    }
}

/// Group `rows` by `key_fn` and sum the amounts of each group.
///
/// This generalizes [`compute_totals`](crate::engine::totals::compute_totals)
/// to arbitrary group keys: per-day spending, per-category spending, and so
/// on. Keys come back in sorted order. Amounts are not validated, so raw
/// data with refunds (negative rows) aggregates as-is. A group sum that
/// does not fit in a decimal is [`BudgetError::Overflow`].
///
/// # Examples
///
/// ```
/// use budget_engine::core::snapshot::ExpenseEntry;
/// use budget_engine::engine::aggregate::aggregate_by;
/// use rust_decimal_macros::dec;
///
/// let rows = vec![
///     ExpenseEntry::new("Rent", dec!(300)).unwrap(),
///     ExpenseEntry::new("Food", dec!(200)).unwrap(),
/// ];
/// let by_initial = aggregate_by(&rows, |e| e.category().as_str().len()).unwrap();
/// assert_eq!(by_initial[&4], dec!(500));
/// ```
pub fn aggregate_by<R, K, F>(
    rows: impl IntoIterator<Item = R>,
    key_fn: F,
) -> BudgetResult<BTreeMap<K, Decimal>>
where
    R: HasAmount,
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut groups = BTreeMap::new();
    for row in rows {
        let sum = groups.entry(key_fn(&row)).or_insert(Decimal::ZERO);
        *sum = add(*sum, row.amount())?;
    }
    Ok(groups)
}

/// Sum of every row, ungrouped.
pub fn grand_total<R: HasAmount>(rows: impl IntoIterator<Item = R>) -> BudgetResult<Decimal> {
    rows.into_iter()
        .try_fold(Decimal::ZERO, |total, r| add(total, r.amount()))
}

/// Sum of the group sums. Equals the [`grand_total`] of the rows the
/// groups were built from.
pub fn groups_total<K>(groups: &BTreeMap<K, Decimal>) -> BudgetResult<Decimal> {
    groups
        .values()
        .try_fold(Decimal::ZERO, |total, sum| add(total, *sum))
}

fn add(total: Decimal, amount: Decimal) -> BudgetResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or(BudgetError::Overflow("aggregate sum"))
}
