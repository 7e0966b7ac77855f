use crate::core::error::{BudgetError, BudgetResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// ISO 4217-style currency code, or a commodity symbol such as `XAU`.
///
/// Codes are upper-cased on construction.
///
/// # Examples
///
/// ```
/// use budget_engine::core::currency::CurrencyCode;
///
/// assert_eq!(CurrencyCode::new("usd"), CurrencyCode::new("USD"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Latest rates quoted against one base: 1 unit of `base` = `rate` units
/// of each symbol.
///
/// This is what the currency and commodity collaborators hand back.
///
/// # Examples
///
/// ```
/// use budget_engine::core::currency::{CurrencyCode, RateTable};
/// use rust_decimal_macros::dec;
///
/// let mut rates = RateTable::new(CurrencyCode::new("USD"));
/// rates.insert(CurrencyCode::new("EUR"), dec!(0.92)).unwrap();
///
/// let eur = rates.convert(dec!(100), &CurrencyCode::new("EUR")).unwrap();
/// assert_eq!(eur, dec!(92));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateTable {
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            base,
            rates: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Record a rate. Rates must be strictly positive.
    pub fn insert(&mut self, symbol: CurrencyCode, rate: Decimal) -> BudgetResult<()> {
        if rate <= Decimal::ZERO {
            return Err(BudgetError::InvalidInput {
                field: "rate",
                value: rate,
                reason: "must be positive",
            });
        }
        self.rates.insert(symbol, rate);
        Ok(())
    }

    /// Rate for `symbol`. The base currency always has rate 1.
    pub fn rate(&self, symbol: &CurrencyCode) -> Option<Decimal> {
        if symbol == &self.base {
            return Some(Decimal::ONE);
        }
        self.rates.get(symbol).copied()
    }

    /// Convert an amount in the base currency into `symbol`. `None` when
    /// the rate is unknown or the result does not fit.
    pub fn convert(&self, amount: Decimal, symbol: &CurrencyCode) -> Option<Decimal> {
        self.rate(symbol).and_then(|r| amount.checked_mul(r))
    }

    /// Keep only the listed symbols, in the order given.
    pub fn select<'a>(
        &'a self,
        symbols: &'a [CurrencyCode],
    ) -> impl Iterator<Item = (&'a CurrencyCode, Option<Decimal>)> + 'a {
        symbols.iter().map(move |s| (s, self.rate(s)))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &Decimal)> {
        self.rates.iter()
    }
}
