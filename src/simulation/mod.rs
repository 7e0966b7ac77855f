//! Synthetic data generation.

pub mod spending;

pub use spending::{generate_snapshot, generate_spending, SpendingConfig};
