//! The markets side of the dashboard.
//!
//! Every widget is fetched concurrently and bounded by its own timeout.
//! A failure only ever marks its own tile unavailable; `refresh` itself
//! cannot fail.

use crate::core::currency::{CurrencyCode, RateTable};
use crate::core::money::{format_currency, format_percent, format_rate};
use crate::market::config::MarketConfig;
use crate::market::error::{Availability, DataUnavailable};
use crate::market::http::{CoinGeckoClient, FredClient, HttpFetcher, RatesClient, YahooChartClient};
use crate::market::source::{CryptoSource, Quote, QuoteSource, RateSource, SeriesObservation, SeriesSource};
use crate::market::watchlist::Watchlist;
use futures::future::join_all;
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// One labelled widget value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile<T> {
    pub label: String,
    #[serde(flatten)]
    pub data: Availability<T>,
}

impl<T> Tile<T> {
    pub fn new(label: impl Into<String>, data: Availability<T>) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }
}

/// Everything the market tabs show after one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub stock: Tile<Quote>,
    /// Units of each currency per one base unit.
    pub currencies: Vec<Tile<Decimal>>,
    /// Base-currency price per coin.
    pub coins: Vec<Tile<Decimal>>,
    /// Base-currency price per unit of each commodity.
    pub commodities: Vec<Tile<Decimal>>,
    pub indices: Vec<Tile<Quote>>,
    pub series: Vec<Tile<SeriesObservation>>,
}

impl MarketSnapshot {
    /// Count of tiles that could not be filled.
    pub fn unavailable_count(&self) -> usize {
        usize::from(!self.stock.data.is_available())
            + down(&self.currencies)
            + down(&self.coins)
            + down(&self.commodities)
            + down(&self.indices)
            + down(&self.series)
    }
}

fn down<T>(tiles: &[Tile<T>]) -> usize {
    tiles.iter().filter(|t| !t.data.is_available()).count()
}

/// Fetches dashboard widgets from the injected collaborators.
pub struct MarketBoard<Q, R, C, S> {
    quotes: Q,
    fx: R,
    metals: R,
    crypto: C,
    series: S,
    timeout: Duration,
}

/// The board wired to the live HTTP adapters.
pub type LiveMarketBoard = MarketBoard<YahooChartClient, RatesClient, CoinGeckoClient, FredClient>;

impl LiveMarketBoard {
    pub fn from_config(config: &MarketConfig) -> Result<Self, DataUnavailable> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(MarketBoard::new(
            YahooChartClient::new(fetcher.clone(), config),
            RatesClient::currencies(fetcher.clone(), config),
            RatesClient::commodities(fetcher.clone(), config),
            CoinGeckoClient::new(fetcher.clone(), config),
            FredClient::new(fetcher, config),
            config.timeout(),
        ))
    }
}

impl<Q, R, C, S> MarketBoard<Q, R, C, S>
where
    Q: QuoteSource,
    R: RateSource,
    C: CryptoSource,
    S: SeriesSource,
{
    pub fn new(quotes: Q, fx: R, metals: R, crypto: C, series: S, timeout: Duration) -> Self {
        Self {
            quotes,
            fx,
            metals,
            crypto,
            series,
            timeout,
        }
    }

    /// Fetch every widget at once.
    pub async fn refresh(&self, watchlist: &Watchlist) -> MarketSnapshot {
        let (stock, currencies, coins, commodities, indices, series) = tokio::join!(
            self.stock(&watchlist.stock),
            self.currencies(watchlist),
            self.coins(watchlist),
            self.commodities(watchlist),
            self.indices(watchlist),
            self.series(watchlist),
        );
        let snapshot = MarketSnapshot {
            stock,
            currencies,
            coins,
            commodities,
            indices,
            series,
        };
        log::info!("market refresh done, {} tile(s) unavailable", snapshot.unavailable_count());
        snapshot
    }

    pub async fn stock(&self, symbol: &str) -> Tile<Quote> {
        Tile::new(symbol, self.guarded(symbol, self.quotes.quote(symbol)).await)
    }

    pub async fn currencies(&self, watchlist: &Watchlist) -> Vec<Tile<Decimal>> {
        let table = self
            .guarded(
                "currencies",
                self.fx.latest_rates(&watchlist.base_currency, &watchlist.currencies),
            )
            .await;
        watchlist
            .currencies
            .iter()
            .map(|code| Tile::new(code.as_str(), rate_of(&table, code)))
            .collect()
    }

    /// Commodity rates come back as units per base unit; tiles hold the
    /// inverse, the price of one unit.
    pub async fn commodities(&self, watchlist: &Watchlist) -> Vec<Tile<Decimal>> {
        let codes = watchlist.commodity_codes();
        let table = self
            .guarded(
                "commodities",
                self.metals.latest_rates(&watchlist.base_currency, &codes),
            )
            .await;
        watchlist
            .commodities
            .iter()
            .zip(&codes)
            .map(|(item, code)| {
                let price = match rate_of(&table, code) {
                    Availability::Available(rate) => Availability::from_result(
                        Decimal::ONE
                            .checked_div(rate)
                            .ok_or_else(|| DataUnavailable::Malformed(format!("rate for {} is {}", code, rate))),
                    ),
                    Availability::Unavailable(e) => Availability::Unavailable(e),
                };
                Tile::new(item.label.as_str(), price)
            })
            .collect()
    }

    pub async fn coins(&self, watchlist: &Watchlist) -> Vec<Tile<Decimal>> {
        let prices: Availability<BTreeMap<String, Decimal>> = self
            .guarded(
                "crypto",
                self.crypto.prices(&watchlist.coins, watchlist.base_currency.as_str()),
            )
            .await;
        watchlist
            .coins
            .iter()
            .map(|coin| {
                let data = match &prices {
                    Availability::Available(map) => match map.get(coin) {
                        Some(price) => Availability::Available(*price),
                        None => {
                            warn!("{}: no price in response", coin);
                            Availability::Unavailable(DataUnavailable::MissingField(coin.clone()))
                        }
                    },
                    Availability::Unavailable(e) => Availability::Unavailable(e.clone()),
                };
                Tile::new(coin.as_str(), data)
            })
            .collect()
    }

    pub async fn indices(&self, watchlist: &Watchlist) -> Vec<Tile<Quote>> {
        join_all(watchlist.indices.iter().map(|item| async move {
            Tile::new(
                item.label.as_str(),
                self.guarded(&item.label, self.quotes.quote(&item.id)).await,
            )
        }))
        .await
    }

    pub async fn series(&self, watchlist: &Watchlist) -> Vec<Tile<SeriesObservation>> {
        join_all(watchlist.series.iter().map(|item| async move {
            Tile::new(
                item.label.as_str(),
                self.guarded(&item.label, self.series.latest(&item.id)).await,
            )
        }))
        .await
    }

    async fn guarded<T>(
        &self,
        widget: &str,
        fetch: impl Future<Output = Result<T, DataUnavailable>>,
    ) -> Availability<T> {
        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(DataUnavailable::Timeout(self.timeout)),
        };
        if let Err(e) = &result {
            warn!("{} unavailable: {}", widget, e);
        }
        Availability::from_result(result)
    }
}

fn rate_of(table: &Availability<RateTable>, code: &CurrencyCode) -> Availability<Decimal> {
    match table {
        Availability::Available(table) => match table.rate(code) {
            Some(rate) => Availability::Available(rate),
            None => {
                warn!("{}: no rate in response", code);
                Availability::Unavailable(DataUnavailable::MissingField(code.to_string()))
            }
        },
        Availability::Unavailable(e) => Availability::Unavailable(e.clone()),
    }
}

const NA: &str = "N/A";

fn opt_money(value: Option<Decimal>) -> String {
    value.map(format_currency).unwrap_or_else(|| NA.to_string())
}

/// One-line summary of a quote, e.g. `$189.50 (+1.2%)`.
pub fn quote_line(quote: &Quote) -> String {
    match (quote.price, quote.change_ratio()) {
        (Some(price), Some(change)) => {
            let sign = if change >= Decimal::ZERO { "+" } else { "" };
            format!("{} ({}{})", format_currency(price), sign, format_percent(change))
        }
        (price, _) => opt_money(price),
    }
}

impl fmt::Display for Tile<Quote> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {:<20} {}", self.label, self.data.display_or("unavailable", quote_line))
    }
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Markets ===")?;
        writeln!(f, "{}", self.stock)?;
        if let Availability::Available(q) = &self.stock.data {
            writeln!(
                f,
                "    open {}  high {}  low {}  volume {}",
                opt_money(q.open),
                opt_money(q.high),
                opt_money(q.low),
                q.volume.map(|v| v.to_string()).unwrap_or_else(|| NA.to_string())
            )?;
        }

        writeln!(f, "\n--- Currencies ---")?;
        for tile in &self.currencies {
            writeln!(f, "  {:<20} {}", tile.label, tile.data.display_or("unavailable", |r| format_rate(*r)))?;
        }
        writeln!(f, "\n--- Crypto ---")?;
        for tile in &self.coins {
            writeln!(f, "  {:<20} {}", tile.label, tile.data.display_or("unavailable", |p| format_currency(*p)))?;
        }
        writeln!(f, "\n--- Commodities ---")?;
        for tile in &self.commodities {
            writeln!(f, "  {:<20} {}", tile.label, tile.data.display_or("unavailable", |p| format_currency(*p)))?;
        }
        writeln!(f, "\n--- Indices ---")?;
        for tile in &self.indices {
            writeln!(f, "{}", tile)?;
        }
        writeln!(f, "\n--- Economics ---")?;
        for tile in &self.series {
            writeln!(
                f,
                "  {:<20} {}",
                tile.label,
                tile.data.display_or("unavailable", |o| format!("{} ({})", o.value, o.date))
            )?;
        }
        Ok(())
    }
}
