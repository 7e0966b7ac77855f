//! Random spending data for demos, benchmarks and load tests.
//!
//! Amounts are drawn in whole cents so generated data is exact in
//! `Decimal`. Pass a seed for reproducible output.

use crate::core::category::CategoryName;
use crate::core::error::BudgetResult;
use crate::core::snapshot::{BudgetSnapshot, DEFAULT_CATEGORIES};
use crate::import::spending::SpendingRow;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Configuration for a generated spending history.
#[derive(Debug, Clone)]
pub struct SpendingConfig {
    /// First day of the history.
    pub start: NaiveDate,
    /// Number of consecutive days.
    pub days: u32,
    /// Upper bound on rows per day; each day gets between 0 and this many.
    pub max_rows_per_day: u32,
    pub categories: Vec<CategoryName>,
    /// Smallest amount in cents.
    pub min_cents: i64,
    /// Largest amount in cents.
    pub max_cents: i64,
    pub seed: Option<u64>,
}

impl Default for SpendingConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 30,
            max_rows_per_day: 4,
            categories: DEFAULT_CATEGORIES.iter().map(|c| CategoryName::new(*c)).collect(),
            min_cents: 100,
            max_cents: 25_000,
            seed: None,
        }
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn cents(rng: &mut StdRng, min: i64, max: i64) -> Decimal {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    Decimal::new(rng.gen_range(lo..=hi), 2)
}

/// Generate spending rows, oldest first.
pub fn generate_spending(config: &SpendingConfig) -> Vec<SpendingRow> {
    let mut rng = rng_for(config.seed);
    let mut rows = Vec::new();
    if config.categories.is_empty() {
        return rows;
    }

    for offset in 0..config.days {
        let Some(date) = config.start.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let count = rng.gen_range(0..=config.max_rows_per_day);
        for _ in 0..count {
            let category = config.categories[rng.gen_range(0..config.categories.len())].clone();
            rows.push(SpendingRow {
                date,
                amount: cents(&mut rng, config.min_cents, config.max_cents),
                category,
            });
        }
    }
    log::debug!("generated {} spending rows over {} days", rows.len(), config.days);
    rows
}

/// A random monthly budget with `categories` expense lines.
///
/// Income is drawn so that roughly a third of budgets come out overspent.
pub fn generate_snapshot(categories: usize, seed: Option<u64>) -> BudgetResult<BudgetSnapshot> {
    let mut rng = rng_for(seed);
    let amounts: Vec<Decimal> = (0..categories).map(|_| cents(&mut rng, 0, 150_000)).collect();
    let spent: Decimal = amounts.iter().sum();
    let income = (spent * Decimal::new(rng.gen_range(50..=200), 2)).round_dp(2);

    BudgetSnapshot::from_pairs(
        income,
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| (format!("Category {:03}", i), amount)),
    )
}
