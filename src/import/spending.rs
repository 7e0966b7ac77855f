//! Spending CSV import.
//!
//! Reads `Date, Amount, Category` records (header required, columns in any
//! order) and groups them with [`aggregate_by`].

use crate::core::category::CategoryName;
use crate::core::error::{BudgetError, BudgetResult};
use crate::engine::aggregate::{aggregate_by, HasAmount};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// One spending record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingRow {
    pub date: NaiveDate,
    /// May be negative for refunds.
    pub amount: Decimal,
    pub category: CategoryName,
}

impl HasAmount for SpendingRow {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Options for reading a spending CSV.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// chrono format for the `Date` column.
    pub date_format: String,
    pub delimiter: u8,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            delimiter: b',',
        }
    }
}

impl ImportOptions {
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

struct Columns {
    date: usize,
    amount: usize,
    category: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> BudgetResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| BudgetError::Import {
                    line: 1,
                    message: format!("missing '{}' column", name),
                })
        };
        Ok(Self {
            date: find("Date")?,
            amount: find("Amount")?,
            category: find("Category")?,
        })
    }
}

/// Parse spending rows from any reader.
pub fn read_spending<R: Read>(reader: R, options: &ImportOptions) -> BudgetResult<Vec<SpendingRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::locate(csv_reader.headers()?)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        rows.push(parse_record(&record, &columns, options, line)?);
    }
    log::debug!("imported {} spending rows", rows.len());
    Ok(rows)
}

/// Parse spending rows from a file on disk.
pub fn read_spending_file(path: impl AsRef<Path>, options: &ImportOptions) -> BudgetResult<Vec<SpendingRow>> {
    let file = std::fs::File::open(path)?;
    read_spending(file, options)
}

/// Write rows back out as `Date,Amount,Category`.
pub fn write_spending<W: Write>(writer: W, rows: &[SpendingRow]) -> BudgetResult<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(["Date", "Amount", "Category"])?;
    for row in rows {
        let date = row.date.format("%Y-%m-%d").to_string();
        let amount = row.amount.to_string();
        csv_writer.write_record([date.as_str(), amount.as_str(), row.category.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Total spending per day, oldest first.
pub fn by_date(rows: &[SpendingRow]) -> BudgetResult<BTreeMap<NaiveDate, Decimal>> {
    aggregate_by(rows, |r| r.date)
}

/// Total spending per category, alphabetical.
pub fn by_category(rows: &[SpendingRow]) -> BudgetResult<BTreeMap<CategoryName, Decimal>> {
    aggregate_by(rows, |r| r.category.clone())
}

fn parse_record(
    record: &StringRecord,
    columns: &Columns,
    options: &ImportOptions,
    line: usize,
) -> BudgetResult<SpendingRow> {
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| BudgetError::Import {
            line,
            message: format!("missing {} value", name),
        })
    };

    let date_str = field(columns.date, "date")?;
    let date = NaiveDate::parse_from_str(date_str, &options.date_format).map_err(|e| {
        BudgetError::Import {
            line,
            message: format!("invalid date '{}': {}", date_str, e),
        }
    })?;

    let amount_str = field(columns.amount, "amount")?;
    let amount = parse_amount(amount_str).ok_or_else(|| BudgetError::Import {
        line,
        message: format!("invalid amount '{}'", amount_str),
    })?;

    let category = field(columns.category, "category")?;
    if category.is_empty() {
        return Err(BudgetError::Import {
            line,
            message: "empty category".to_string(),
        });
    }

    Ok(SpendingRow {
        date,
        amount,
        category: CategoryName::new(category),
    })
}

/// Accepts `1234.5`, `$1,234.50` and `-$12.00`.
fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
