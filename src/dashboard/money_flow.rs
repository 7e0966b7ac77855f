//! Sankey data for the "where does the money go" chart.

use crate::core::money::format_currency;
use crate::core::snapshot::BudgetSnapshot;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

pub const INCOME_NODE: &str = "Income";
pub const SAVINGS_NODE: &str = "Savings";

/// One link between two nodes, by node index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: Decimal,
}

/// Nodes and links of the money-flow diagram.
///
/// Node 0 is always income. Every category with a positive amount gets a
/// node and a link from income; a positive remaining balance becomes a
/// final "Savings" node. Zero-amount categories are left out since they
/// would draw nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyFlow {
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
}

impl MoneyFlow {
    pub fn from_snapshot(snapshot: &BudgetSnapshot) -> Self {
        let mut nodes = vec![INCOME_NODE.to_string()];
        let mut links = Vec::new();

        for entry in snapshot.expenses() {
            if entry.amount() <= Decimal::ZERO {
                continue;
            }
            nodes.push(entry.category().to_string());
            links.push(FlowLink {
                source: 0,
                target: nodes.len() - 1,
                value: entry.amount(),
            });
        }

        let remaining = snapshot.totals().remaining_balance;
        if remaining > Decimal::ZERO {
            nodes.push(SAVINGS_NODE.to_string());
            links.push(FlowLink {
                source: 0,
                target: nodes.len() - 1,
                value: remaining,
            });
        }

        Self { nodes, links }
    }

    /// Sum of all outgoing link values: income when there are savings,
    /// total expenses otherwise.
    pub fn outflow(&self) -> Decimal {
        // Bounded by the snapshot's income or expense total, both in range.
        self.links
            .iter()
            .fold(Decimal::ZERO, |total, l| total.saturating_add(l.value))
    }

    pub fn label(&self, node: usize) -> Option<&str> {
        self.nodes.get(node).map(String::as_str)
    }
}

impl fmt::Display for MoneyFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Money Flow ===")?;
        if self.links.is_empty() {
            return writeln!(f, "  (nothing flows)");
        }
        for link in &self.links {
            writeln!(
                f,
                "  {} -> {:<16} {:>14}",
                self.label(link.source).unwrap_or("?"),
                self.label(link.target).unwrap_or("?"),
                format_currency(link.value)
            )?;
        }
        Ok(())
    }
}
