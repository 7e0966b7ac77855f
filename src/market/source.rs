//! Collaborator interfaces for market, currency, crypto and economic data.
//!
//! The dashboard only talks to these traits. The HTTP adapters in
//! [`super::http`] implement them against live APIs; tests use in-memory
//! implementations.

use crate::core::currency::{CurrencyCode, RateTable};
use crate::market::error::DataUnavailable;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;

/// Latest trading data for a ticker or index.
///
/// Every field but `symbol` is optional; a missing field is shown as "N/A"
/// and does not make the quote unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: Option<Decimal>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub volume: Option<u64>,
    pub market_cap: Option<Decimal>,
    /// Daily closes for the recent trend chart, oldest first.
    pub history: Vec<PricePoint>,
}

impl Quote {
    /// Change since the previous close, as a ratio.
    pub fn change_ratio(&self) -> Option<Decimal> {
        let price = self.price?;
        let prev = self.previous_close?;
        if prev.is_zero() {
            return None;
        }
        price.checked_sub(prev)?.checked_div(prev)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Most recent value of an economic time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesObservation {
    pub series_id: String,
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Stock and index quotes.
pub trait QuoteSource: Send + Sync {
    fn quote(&self, symbol: &str) -> impl Future<Output = Result<Quote, DataUnavailable>> + Send;
}

/// Latest rates against a base currency (fiat or commodity).
pub trait RateSource: Send + Sync {
    fn latest_rates(
        &self,
        base: &CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> impl Future<Output = Result<RateTable, DataUnavailable>> + Send;
}

/// Crypto spot prices, keyed by coin id.
///
/// Coins the provider does not know are simply absent from the map.
pub trait CryptoSource: Send + Sync {
    fn prices(
        &self,
        coins: &[String],
        vs_currency: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, Decimal>, DataUnavailable>> + Send;
}

/// Economic indicator series.
pub trait SeriesSource: Send + Sync {
    fn latest(
        &self,
        series_id: &str,
    ) -> impl Future<Output = Result<SeriesObservation, DataUnavailable>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_change_ratio() {
        let quote = Quote {
            symbol: "AAPL".into(),
            price: Some(dec!(110)),
            previous_close: Some(dec!(100)),
            ..Default::default()
        };
        assert_eq!(quote.change_ratio(), Some(dec!(0.1)));
    }

    #[test]
    fn test_change_ratio_missing_fields() {
        let quote = Quote {
            symbol: "AAPL".into(),
            price: Some(dec!(110)),
            ..Default::default()
        };
        assert_eq!(quote.change_ratio(), None);
    }

    #[test]
    fn test_change_ratio_out_of_range() {
        let quote = Quote {
            symbol: "AAPL".into(),
            price: Some(Decimal::MAX),
            previous_close: Some(dec!(-1)),
            ..Default::default()
        };
        assert_eq!(quote.change_ratio(), None);
    }
}
