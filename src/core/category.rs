use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an expense category ("Rent", "Food", ...).
///
/// Names are compared exactly after trimming surrounding whitespace, so
/// `" Rent "` and `"Rent"` are the same category.
///
/// # Examples
///
/// ```
/// use budget_engine::core::category::CategoryName;
///
/// let rent = CategoryName::new(" Rent ");
/// assert_eq!(rent.as_str(), "Rent");
/// assert_ne!(rent, CategoryName::new("Food"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.len() == name.len() {
            Self(name)
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CategoryName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
