//! Static reference content: finance concepts and recommended sites.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A finance term the dashboard explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    Stocks,
    Interest,
    CompoundInterest,
    Inflation,
    Budgeting,
    BondYield,
    LoanPayment,
}

/// Calculator attached to a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Calculator {
    CompoundInterest,
    LoanPayment,
}

impl Concept {
    /// Every concept, in menu order.
    pub const ALL: [Concept; 7] = [
        Concept::Stocks,
        Concept::Interest,
        Concept::CompoundInterest,
        Concept::Inflation,
        Concept::Budgeting,
        Concept::BondYield,
        Concept::LoanPayment,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Stocks => "Stocks",
            Self::Interest => "Interest",
            Self::CompoundInterest => "Compound Interest",
            Self::Inflation => "Inflation",
            Self::Budgeting => "Budgeting",
            Self::BondYield => "Bond Yield",
            Self::LoanPayment => "Loan Payment",
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            Self::Stocks => "Shares in a company. Owners may benefit from growth or dividends.",
            Self::Interest => "The cost of borrowing money or the reward for saving.",
            Self::CompoundInterest => {
                "Interest on your initial money and on the interest that accumulates."
            }
            Self::Inflation => "The rate at which prices rise, reducing purchasing power.",
            Self::Budgeting => "Creating a plan for spending and saving money.",
            Self::BondYield => {
                "The return an investor gets on a bond, usually expressed as a percentage."
            }
            Self::LoanPayment => "The regular payment required to pay off a loan over time.",
        }
    }

    /// The calculator shown next to the explanation, if any.
    pub fn calculator(self) -> Option<Calculator> {
        match self {
            Self::CompoundInterest => Some(Calculator::CompoundInterest),
            Self::LoanPayment => Some(Calculator::LoanPayment),
            _ => None,
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.explanation())
    }
}

/// Unknown concept name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown concept '{0}'")]
pub struct UnknownConcept(pub String);

impl FromStr for Concept {
    type Err = UnknownConcept;

    /// Accepts the title in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        Concept::ALL
            .into_iter()
            .find(|c| {
                c.title()
                    .chars()
                    .filter(|ch| ch.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .eq(wanted.chars())
            })
            .ok_or_else(|| UnknownConcept(s.to_string()))
    }
}

/// A recommended finance website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl Resource {
    pub fn new(name: &str, url: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            description: description.to_string(),
        }
    }
}

/// The "top finance websites" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceList(pub Vec<Resource>);

impl Default for ResourceList {
    fn default() -> Self {
        Self(vec![
            Resource::new(
                "Investopedia",
                "https://www.investopedia.com/",
                "Comprehensive guides and articles on investing, markets, and personal finance.",
            ),
            Resource::new(
                "NerdWallet",
                "https://www.nerdwallet.com/",
                "Compare financial products, credit cards, and get money advice.",
            ),
            Resource::new(
                "Yahoo Finance",
                "https://finance.yahoo.com/",
                "Market news, stock quotes, and portfolio management.",
            ),
            Resource::new(
                "Bloomberg",
                "https://www.bloomberg.com/",
                "Latest news on markets, economies, and companies worldwide.",
            ),
            Resource::new(
                "Khan Academy Finance",
                "https://www.khanacademy.org/economics-finance-domain/core-finance",
                "Free, clear lessons on finance, economics, and investing.",
            ),
            Resource::new(
                "Federal Reserve Education",
                "https://www.federalreserveeducation.org/",
                "U.S. central bank education site on money, banking, and economics.",
            ),
            Resource::new(
                "World Bank",
                "https://www.worldbank.org/",
                "Global economic data, research, and country profiles.",
            ),
        ])
    }
}

impl ResourceList {
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Finance Websites ===")?;
        for site in self.iter() {
            writeln!(f, "  {} <{}>", site.name, site.url)?;
            writeln!(f, "      {}", site.description)?;
        }
        Ok(())
    }
}
