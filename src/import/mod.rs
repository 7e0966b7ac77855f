//! Spending data import.

pub mod spending;

pub use spending::{by_category, by_date, read_spending, read_spending_file, ImportOptions, SpendingRow};
