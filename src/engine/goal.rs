use crate::core::error::{BudgetError, BudgetResult};
use crate::core::money::format_percent;
use rust_decimal::Decimal;
use serde::Serialize;

/// How far the remaining balance goes towards a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "ratio", rename_all = "snake_case")]
pub enum GoalProgress {
    /// Ratio in `[0, 1]`.
    Ratio(Decimal),
    /// The goal is zero.
    NoGoalSet,
}

impl GoalProgress {
    pub fn ratio(&self) -> Option<Decimal> {
        match self {
            Self::Ratio(r) => Some(*r),
            Self::NoGoalSet => None,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Ratio(r) if *r >= Decimal::ONE)
    }

    /// Text for a progress bar label.
    pub fn display(&self) -> String {
        match self {
            Self::Ratio(r) => format_percent(*r),
            Self::NoGoalSet => "No goal set".to_string(),
        }
    }
}

/// Progress of `remaining_balance` towards `goal`, clamped to `[0, 1]`.
///
/// A zero goal yields [`GoalProgress::NoGoalSet`] instead of dividing by
/// zero. A negative goal is invalid input.
///
/// # Examples
///
/// ```
/// use budget_engine::engine::goal::{compute_goal_progress, GoalProgress};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     compute_goal_progress(dec!(500), dec!(1000)).unwrap(),
///     GoalProgress::Ratio(dec!(0.5))
/// );
/// assert_eq!(
///     compute_goal_progress(dec!(500), dec!(0)).unwrap(),
///     GoalProgress::NoGoalSet
/// );
/// ```
pub fn compute_goal_progress(remaining_balance: Decimal, goal: Decimal) -> BudgetResult<GoalProgress> {
    if goal < Decimal::ZERO {
        log::debug!("rejected goal = {goal}: negative");
        return Err(BudgetError::negative("goal", goal));
    }
    if goal.is_zero() {
        return Ok(GoalProgress::NoGoalSet);
    }
    if remaining_balance <= Decimal::ZERO {
        return Ok(GoalProgress::Ratio(Decimal::ZERO));
    }
    if remaining_balance >= goal {
        return Ok(GoalProgress::Ratio(Decimal::ONE));
    }
    // 0 < remaining < goal, so the quotient lies strictly inside (0, 1).
    Ok(GoalProgress::Ratio(remaining_balance / goal))
}
