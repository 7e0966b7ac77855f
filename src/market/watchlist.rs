use crate::core::currency::CurrencyCode;
use serde::{Deserialize, Serialize};

/// A display label paired with the identifier a collaborator understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchItem {
    pub label: String,
    pub id: String,
}

impl WatchItem {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

/// Everything the market board tracks.
///
/// The default mirrors the classic dashboard: one stock, the majors
/// against USD, five coins, five commodities, six world indices and three
/// US indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    pub stock: String,
    pub base_currency: CurrencyCode,
    pub currencies: Vec<CurrencyCode>,
    pub coins: Vec<String>,
    pub commodities: Vec<WatchItem>,
    pub indices: Vec<WatchItem>,
    pub series: Vec<WatchItem>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self {
            stock: "AAPL".to_string(),
            base_currency: CurrencyCode::new("USD"),
            currencies: ["EUR", "JPY", "GBP", "CAD", "AUD"]
                .into_iter()
                .map(CurrencyCode::new)
                .collect(),
            coins: ["bitcoin", "ethereum", "dogecoin", "solana", "cardano"]
                .into_iter()
                .map(String::from)
                .collect(),
            commodities: vec![
                WatchItem::new("Gold", "XAU"),
                WatchItem::new("Silver", "XAG"),
                WatchItem::new("Crude Oil", "WTI"),
                WatchItem::new("Platinum", "XPT"),
                WatchItem::new("Copper", "XCU"),
            ],
            indices: vec![
                WatchItem::new("S&P 500", "^GSPC"),
                WatchItem::new("Dow Jones", "^DJI"),
                WatchItem::new("Nasdaq", "^IXIC"),
                WatchItem::new("FTSE 100", "^FTSE"),
                WatchItem::new("DAX", "^GDAXI"),
                WatchItem::new("Nikkei", "^N225"),
            ],
            series: vec![
                WatchItem::new("US Inflation Rate", "CPILFESL"),
                WatchItem::new("US Unemployment Rate", "UNRATE"),
                WatchItem::new("US GDP", "GDP"),
            ],
        }
    }
}

impl Watchlist {
    pub fn commodity_codes(&self) -> Vec<CurrencyCode> {
        self.commodities.iter().map(|c| CurrencyCode::new(&c.id)).collect()
    }

    pub fn with_stock(mut self, symbol: impl Into<String>) -> Self {
        self.stock = symbol.into();
        self
    }
}
