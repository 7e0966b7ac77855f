//! Compound-interest and loan-payment calculators.

use crate::core::error::{ensure_non_negative, BudgetError, BudgetResult};
use crate::core::money::format_currency;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

const MONTHS_PER_YEAR: u32 = 12;

/// Future value of `principal` compounded `compounds_per_year` times a year.
///
/// `futureValue = principal * (1 + (rate/100) / n) ^ (n * years)`
///
/// The rate may be zero or negative (deflation) as long as each period
/// keeps something: a per-period rate of -100% or less is invalid input.
/// `years` may be fractional; a whole number of periods uses exact
/// integer powers. A deflating factor too small for a decimal is zero.
///
/// # Examples
///
/// ```
/// use budget_engine::engine::projection::compound_interest;
/// use rust_decimal_macros::dec;
///
/// let fv = compound_interest(dec!(1000), dec!(5.0), dec!(10), 1).unwrap();
/// assert_eq!(fv.round_dp(2), dec!(1628.89));
/// ```
pub fn compound_interest(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: Decimal,
    compounds_per_year: u32,
) -> BudgetResult<Decimal> {
    let principal = ensure_non_negative("principal", principal)?;
    let years = ensure_non_negative("years", years)?;
    if compounds_per_year < 1 {
        return Err(BudgetError::InvalidInput {
            field: "compounds_per_year",
            value: Decimal::from(compounds_per_year),
            reason: "must be at least 1",
        });
    }

    let periods_per_year = Decimal::from(compounds_per_year);
    let periodic_rate = annual_rate_percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|r| r.checked_div(periods_per_year))
        .ok_or(BudgetError::Overflow("periodic rate"))?;
    let base = Decimal::ONE + periodic_rate;
    if base <= Decimal::ZERO {
        return Err(BudgetError::InvalidInput {
            field: "annual_rate_percent",
            value: annual_rate_percent,
            reason: "rate per period must be above -100%",
        });
    }

    let periods = periods_per_year
        .checked_mul(years)
        .ok_or(BudgetError::Overflow("compounding periods"))?;
    let growth = growth_factor(base, periods)?;
    principal
        .checked_mul(growth)
        .ok_or(BudgetError::Overflow("future value"))
}

/// Monthly payment that amortizes `loan_amount` over `term_months`.
///
/// With a zero rate the loan is split evenly. Otherwise the standard
/// annuity formula is used with `monthlyRate = (rate/100) / 12`.
///
/// A zero term is a [`BudgetError::ZeroDivision`]; negative amounts or
/// rates are invalid input.
///
/// # Examples
///
/// ```
/// use budget_engine::engine::projection::loan_monthly_payment;
/// use rust_decimal_macros::dec;
///
/// let payment = loan_monthly_payment(dec!(10000), dec!(5.0), 60).unwrap();
/// assert_eq!(payment.round_dp(2), dec!(188.71));
///
/// let flat = loan_monthly_payment(dec!(10000), dec!(0), 60).unwrap();
/// assert_eq!(flat.round_dp(2), dec!(166.67));
/// ```
pub fn loan_monthly_payment(
    loan_amount: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> BudgetResult<Decimal> {
    let loan_amount = ensure_non_negative("loan_amount", loan_amount)?;
    let annual_rate_percent = ensure_non_negative("annual_rate_percent", annual_rate_percent)?;
    if term_months == 0 {
        log::debug!("rejected loan term of zero months");
        return Err(BudgetError::ZeroDivision("term_months"));
    }
    let months = Decimal::from(term_months);

    let monthly_rate = annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
    // Also covers rates too small to survive the division.
    if monthly_rate.is_zero() {
        return Ok(loan_amount / months);
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(term_months))
        .ok_or(BudgetError::Overflow("loan growth factor"))?;
    // (1 + r)^-n == 1 / (1 + r)^n
    let discount = Decimal::ONE - Decimal::ONE / growth;
    if discount.is_zero() {
        return Err(BudgetError::ZeroDivision("loan discount factor"));
    }
    loan_amount
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_div(discount))
        .ok_or(BudgetError::Overflow("monthly payment"))
}

/// Payment plus what the loan costs over its whole term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanSummary {
    pub monthly_payment: Decimal,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
}

impl LoanSummary {
    pub fn compute(
        loan_amount: Decimal,
        annual_rate_percent: Decimal,
        term_months: u32,
    ) -> BudgetResult<Self> {
        let monthly_payment = loan_monthly_payment(loan_amount, annual_rate_percent, term_months)?;
        let total_paid = monthly_payment
            .checked_mul(Decimal::from(term_months))
            .ok_or(BudgetError::Overflow("total paid"))?;
        Ok(Self {
            monthly_payment,
            total_paid,
            total_interest: total_paid - loan_amount,
        })
    }
}

impl std::fmt::Display for LoanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Monthly Payment: {}", format_currency(self.monthly_payment))?;
        writeln!(f, "Total Paid:      {}", format_currency(self.total_paid))?;
        write!(f, "Total Interest:  {}", format_currency(self.total_interest))
    }
}

fn growth_factor(base: Decimal, periods: Decimal) -> BudgetResult<Decimal> {
    if periods.is_zero() || base == Decimal::ONE {
        return Ok(Decimal::ONE);
    }
    let factor = if periods.fract().is_zero() {
        periods.to_u64().and_then(|n| base.checked_powu(n))
    } else {
        base.checked_powd(periods)
    };
    match factor {
        Some(factor) => Ok(factor),
        // 0 < base < 1: the factor shrinks towards zero and can only underflow.
        None if base < Decimal::ONE => Ok(Decimal::ZERO),
        None => Err(BudgetError::Overflow("growth factor")),
    }
}
