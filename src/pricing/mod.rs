pub mod calculator;
pub mod models;
pub mod table;

pub use calculator::CostCalculator;
pub use models::{CostBreakdown, PricingEntry, UsdAmount, CURRENCY};
pub use table::PricingTable;
