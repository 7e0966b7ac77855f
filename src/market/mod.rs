//! External market-data collaborators.
//!
//! Nothing in the budget engine depends on this module. It defines the
//! narrow interfaces the dashboard consumes, the HTTP adapters behind
//! them, and the "data unavailable" error every failure collapses into.

pub mod config;
pub mod error;
pub mod http;
pub mod source;
pub mod watchlist;

pub use config::MarketConfig;
pub use error::{Availability, DataUnavailable};
pub use source::{CryptoSource, PricePoint, Quote, QuoteSource, RateSource, SeriesObservation, SeriesSource};
pub use watchlist::{WatchItem, Watchlist};
