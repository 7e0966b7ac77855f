//! Live market board example.
//!
//! Fetches every widget of the default watchlist. Widgets whose API is
//! down, slow or missing a key show as unavailable; the rest still render.
//!
//! ```bash
//! BUDGET_DASH__FRED_API_KEY=... cargo run --example market_board
//! ```

use budget_engine::dashboard::LiveMarketBoard;
use budget_engine::market::{MarketConfig, Watchlist};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MarketConfig::load().unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });
    let board = LiveMarketBoard::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Error building HTTP client: {}", e);
        std::process::exit(1);
    });

    let snapshot = board.refresh(&Watchlist::default()).await;
    println!("{}", snapshot);
    println!("{} tile(s) unavailable", snapshot.unavailable_count());
}
