//! HTTP adapters for the collaborator traits.
//!
//! Each client is a thin request builder; the payload handling lives in
//! the `parse_*` functions so it can be tested without a network.

use crate::core::currency::{CurrencyCode, RateTable};
use crate::market::config::MarketConfig;
use crate::market::error::DataUnavailable;
use crate::market::source::{
    CryptoSource, PricePoint, Quote, QuoteSource, RateSource, SeriesObservation, SeriesSource,
};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

/// Shared `reqwest` client with the configured timeout and user agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &MarketConfig) -> Result<Self, DataUnavailable> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(DataUnavailable::from)?;
        Ok(Self { client, timeout })
    }

    /// GET `url` with `query` and decode the body as JSON.
    ///
    /// Only the URL without its query string is logged.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, DataUnavailable> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataUnavailable::Status(status.as_u16()));
        }
        response.json::<Value>().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> DataUnavailable {
        if err.is_timeout() {
            DataUnavailable::Timeout(self.timeout)
        } else {
            DataUnavailable::from(err)
        }
    }
}

/// Quotes from the Yahoo Finance chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    fetcher: HttpFetcher,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(fetcher: HttpFetcher, config: &MarketConfig) -> Self {
        Self {
            fetcher,
            base_url: trim_base(&config.quotes_base_url),
        }
    }
}

impl QuoteSource for YahooChartClient {
    async fn quote(&self, symbol: &str) -> Result<Quote, DataUnavailable> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let body = self
            .fetcher
            .get_json(&url, &[("range", "1mo"), ("interval", "1d")])
            .await?;
        parse_chart(symbol, &body)
    }
}

/// Which rates API a [`RatesClient`] talks to. Both answer with
/// `{"rates": {SYMBOL: number}}`.
#[derive(Debug, Clone)]
pub enum RatesEndpoint {
    /// `GET {base}/v4/latest/{BASE}`, no key.
    ExchangeRate { base_url: String },
    /// `GET {base}/latest?access_key=..&base=..&symbols=..`
    Metals {
        base_url: String,
        api_key: Option<String>,
    },
}

/// Currency or commodity rates.
#[derive(Debug, Clone)]
pub struct RatesClient {
    fetcher: HttpFetcher,
    endpoint: RatesEndpoint,
}

impl RatesClient {
    pub fn currencies(fetcher: HttpFetcher, config: &MarketConfig) -> Self {
        Self {
            fetcher,
            endpoint: RatesEndpoint::ExchangeRate {
                base_url: trim_base(&config.rates_base_url),
            },
        }
    }

    pub fn commodities(fetcher: HttpFetcher, config: &MarketConfig) -> Self {
        Self {
            fetcher,
            endpoint: RatesEndpoint::Metals {
                base_url: trim_base(&config.metals_base_url),
                api_key: config.metals_api_key.clone(),
            },
        }
    }
}

impl RateSource for RatesClient {
    async fn latest_rates(
        &self,
        base: &CurrencyCode,
        symbols: &[CurrencyCode],
    ) -> Result<RateTable, DataUnavailable> {
        let body = match &self.endpoint {
            RatesEndpoint::ExchangeRate { base_url } => {
                let url = format!("{}/v4/latest/{}", base_url, base);
                self.fetcher.get_json(&url, &[]).await?
            }
            RatesEndpoint::Metals { base_url, api_key } => {
                let key = api_key
                    .as_deref()
                    .ok_or(DataUnavailable::MissingApiKey("Metals-API"))?;
                let url = format!("{}/latest", base_url);
                let joined = symbols
                    .iter()
                    .map(CurrencyCode::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                self.fetcher
                    .get_json(
                        &url,
                        &[("access_key", key), ("base", base.as_str()), ("symbols", joined.as_str())],
                    )
                    .await?
            }
        };
        parse_rates(base, &body)
    }
}

/// Spot prices from CoinGecko's `simple/price` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    fetcher: HttpFetcher,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(fetcher: HttpFetcher, config: &MarketConfig) -> Self {
        Self {
            fetcher,
            base_url: trim_base(&config.crypto_base_url),
        }
    }
}

impl CryptoSource for CoinGeckoClient {
    async fn prices(
        &self,
        coins: &[String],
        vs_currency: &str,
    ) -> Result<BTreeMap<String, Decimal>, DataUnavailable> {
        let url = format!("{}/simple/price", self.base_url);
        let ids = coins.join(",");
        let vs = vs_currency.to_ascii_lowercase();
        let body = self
            .fetcher
            .get_json(&url, &[("ids", ids.as_str()), ("vs_currencies", vs.as_str())])
            .await?;
        parse_simple_price(&body, &vs)
    }
}

/// Economic series from FRED.
#[derive(Debug, Clone)]
pub struct FredClient {
    fetcher: HttpFetcher,
    base_url: String,
    api_key: Option<String>,
}

impl FredClient {
    pub fn new(fetcher: HttpFetcher, config: &MarketConfig) -> Self {
        Self {
            fetcher,
            base_url: trim_base(&config.fred_base_url),
            api_key: config.fred_api_key.clone(),
        }
    }
}

impl SeriesSource for FredClient {
    async fn latest(&self, series_id: &str) -> Result<SeriesObservation, DataUnavailable> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(DataUnavailable::MissingApiKey("FRED"))?;
        let url = format!("{}/series/observations", self.base_url);
        let body = self
            .fetcher
            .get_json(
                &url,
                &[("series_id", series_id), ("api_key", key), ("file_type", "json")],
            )
            .await?;
        parse_observations(series_id, &body)
    }
}

/// Read a quote out of a `v8/finance/chart` payload.
pub fn parse_chart(symbol: &str, body: &Value) -> Result<Quote, DataUnavailable> {
    let result = body
        .pointer("/chart/result/0")
        .filter(|v| v.is_object())
        .ok_or_else(|| chart_error(body))?;
    let meta = result
        .get("meta")
        .ok_or_else(|| DataUnavailable::MissingField("chart meta".to_string()))?;

    let quote_block = result.pointer("/indicators/quote/0");
    let opens = quote_block.and_then(|q| q.get("open"));
    let closes = quote_block.and_then(|q| q.get("close"));

    let mut history = Vec::new();
    if let (Some(Value::Array(stamps)), Some(Value::Array(closes))) = (result.get("timestamp"), closes) {
        for (stamp, close) in stamps.iter().zip(closes) {
            let date = stamp
                .as_i64()
                .and_then(|s| DateTime::from_timestamp(s, 0))
                .map(|dt| dt.date_naive());
            if let (Some(date), Some(close)) = (date, json_decimal(close)) {
                history.push(PricePoint { date, close });
            }
        }
    }

    Ok(Quote {
        symbol: meta
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or(symbol)
            .to_string(),
        price: meta.get("regularMarketPrice").and_then(json_decimal),
        open: opens
            .and_then(|o| o.as_array())
            .and_then(|o| o.last())
            .and_then(json_decimal),
        high: meta.get("regularMarketDayHigh").and_then(json_decimal),
        low: meta.get("regularMarketDayLow").and_then(json_decimal),
        previous_close: meta
            .get("previousClose")
            .or_else(|| meta.get("chartPreviousClose"))
            .and_then(json_decimal),
        volume: meta.get("regularMarketVolume").and_then(Value::as_u64),
        market_cap: meta.get("marketCap").and_then(json_decimal),
        history,
    })
}

/// Read a `{"rates": {...}}` payload. Non-positive or non-numeric rates
/// are dropped.
pub fn parse_rates(base: &CurrencyCode, body: &Value) -> Result<RateTable, DataUnavailable> {
    let rates = body
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| DataUnavailable::MissingField("rates".to_string()))?;

    let mut table = RateTable::new(base.clone());
    for (symbol, value) in rates {
        let inserted = json_decimal(value)
            .map(|rate| table.insert(CurrencyCode::new(symbol), rate).is_ok())
            .unwrap_or(false);
        if !inserted {
            log::warn!("skipping unusable rate for {}: {}", symbol, value);
        }
    }
    Ok(table)
}

/// Read a `simple/price` payload: `{coin: {vs: number}}`.
pub fn parse_simple_price(body: &Value, vs_currency: &str) -> Result<BTreeMap<String, Decimal>, DataUnavailable> {
    let coins = body
        .as_object()
        .ok_or_else(|| DataUnavailable::Malformed("expected a JSON object".to_string()))?;
    Ok(coins
        .iter()
        .filter_map(|(coin, prices)| {
            prices
                .get(vs_currency)
                .and_then(json_decimal)
                .map(|p| (coin.clone(), p))
        })
        .collect())
}

/// Take the latest observation from a FRED `series/observations` payload.
///
/// FRED marks a missing value with `"."`.
pub fn parse_observations(series_id: &str, body: &Value) -> Result<SeriesObservation, DataUnavailable> {
    let latest = body
        .get("observations")
        .and_then(Value::as_array)
        .and_then(|obs| obs.last())
        .ok_or_else(|| DataUnavailable::MissingField(format!("observations for {}", series_id)))?;

    let date = latest
        .get("date")
        .and_then(Value::as_str)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| DataUnavailable::Malformed(format!("bad observation date for {}", series_id)))?;

    let value = latest
        .get("value")
        .and_then(json_decimal)
        .ok_or_else(|| DataUnavailable::MissingField(format!("latest value for {}", series_id)))?;

    Ok(SeriesObservation {
        series_id: series_id.to_string(),
        date,
        value,
    })
}

/// Numbers go through their shortest textual form so `0.92` stays `0.92`.
fn json_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn chart_error(body: &Value) -> DataUnavailable {
    match body.pointer("/chart/error/description").and_then(Value::as_str) {
        Some(description) => DataUnavailable::Malformed(description.to_string()),
        None => DataUnavailable::MissingField("chart result".to_string()),
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
