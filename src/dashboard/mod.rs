//! Dashboard view models built on the engine and the market collaborators.

pub mod budget_view;
pub mod market_board;
pub mod money_flow;
pub mod reference;

pub use budget_view::{BudgetView, InputEvent, ViewChanges};
pub use market_board::{LiveMarketBoard, MarketBoard, MarketSnapshot, Tile};
pub use money_flow::{FlowLink, MoneyFlow};
pub use reference::{Calculator, Concept, Resource, ResourceList};
