//! Foundational types: categories, snapshots, currencies, errors and
//! display formatting.

pub mod category;
pub mod currency;
pub mod error;
pub mod money;
pub mod snapshot;
