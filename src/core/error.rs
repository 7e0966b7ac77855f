use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the budget engine and the spending importer.
///
/// Every engine operation returns these as values. Nothing in the engine
/// panics on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// A precondition on an input value was violated.
    #[error("invalid {field}: {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    },

    /// A divisor that must be non-zero was zero.
    #[error("division by zero: {0} must not be zero")]
    ZeroDivision(&'static str),

    /// The result does not fit in a decimal.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    /// A category name appears twice in one snapshot.
    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    /// A category name is not part of the snapshot.
    #[error("category not found: {0}")]
    UnknownCategory(String),

    /// A spending record could not be parsed.
    #[error("import error on line {line}: {message}")]
    Import { line: usize, message: String },

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl BudgetError {
    pub(crate) fn negative(field: &'static str, value: Decimal) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason: "must not be negative",
        }
    }

    /// True for precondition violations (bad numbers at the boundary).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        Self::Import {
            line,
            message: err.to_string(),
        }
    }
}

/// Result alias for engine operations.
pub type BudgetResult<T> = Result<T, BudgetError>;

/// Reject a negative value for `field`.
pub(crate) fn ensure_non_negative(field: &'static str, value: Decimal) -> BudgetResult<Decimal> {
    if value < Decimal::ZERO {
        log::debug!("rejected {field} = {value}: negative");
        return Err(BudgetError::negative(field, value));
    }
    Ok(value)
}
